// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Database schema definitions for the UDD tables served by the API.
//!
//! Column order is significant: rows are mapped onto resources by position,
//! so each table lists its columns in the order the resource declares them.

/// Quote an SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Full schema SQL (bugs, developers, packages, sources, popcon)
pub const SCHEMA_SQL: &str = r#"
create table if not exists bugs (
    id                   integer primary key not null,
    package              text,
    source               text,
    arrival              text,
    status               text,
    severity             text,
    submitter            text,
    submitter_name       text,
    submitter_email      text,
    owner                text,
    owner_name           text,
    owner_email          text,
    done                 text,
    done_name            text,
    done_email           text,
    done_date            text,
    title                text,
    last_modified        text,
    forwarded            text,
    affects_oldstable    integer,
    affects_stable       integer,
    affects_testing      integer,
    affects_unstable     integer,
    affects_experimental integer
);

create table if not exists archived_bugs (
    id                   integer primary key not null,
    package              text,
    source               text,
    arrival              text,
    status               text,
    severity             text,
    submitter            text,
    submitter_name       text,
    submitter_email      text,
    owner                text,
    owner_name           text,
    owner_email          text,
    done                 text,
    done_name            text,
    done_email           text,
    done_date            text,
    title                text,
    last_modified        text,
    forwarded            text,
    affects_oldstable    integer,
    affects_stable       integer,
    affects_testing      integer,
    affects_unstable     integer,
    affects_experimental integer
);

create table if not exists bugs_blocks (id integer not null, blocked integer not null);
create table if not exists bugs_blockedby (id integer not null, blocker integer not null);
create table if not exists bugs_merged_with (id integer not null, merged_with integer not null);
create table if not exists bugs_fixed_in (id integer not null, version text not null);
create table if not exists bugs_found_in (id integer not null, version text not null);
create table if not exists bugs_tags (id integer not null, tag text not null);
create table if not exists bugs_packages (id integer not null, package text, source text);
create table if not exists bugs_usertags (email text not null, tag text not null, id integer not null);

create table if not exists archived_bugs_blocks (id integer not null, blocked integer not null);
create table if not exists archived_bugs_blockedby (id integer not null, blocker integer not null);
create table if not exists archived_bugs_merged_with (id integer not null, merged_with integer not null);
create table if not exists archived_bugs_fixed_in (id integer not null, version text not null);
create table if not exists archived_bugs_found_in (id integer not null, version text not null);
create table if not exists archived_bugs_tags (id integer not null, tag text not null);
create table if not exists archived_bugs_packages (id integer not null, package text, source text);

create index if not exists IndexBugsBlocks on bugs_blocks(id);
create index if not exists IndexBugsBlockedBy on bugs_blockedby(id);
create index if not exists IndexBugsMergedWith on bugs_merged_with(id);
create index if not exists IndexBugsUsertags on bugs_usertags(id);
create index if not exists IndexArchivedBugsMergedWith on archived_bugs_merged_with(id);

create table if not exists carnivore_login (
    id    integer primary key not null,
    login text
);
create table if not exists carnivore_emails (id integer not null, email text not null);
create table if not exists carnivore_names (id integer not null, name text not null);
create table if not exists carnivore_keys (id integer not null, "key" text not null, key_type text);

create table if not exists packages (
    package          text not null,
    version          text not null,
    architecture     text not null,
    maintainer       text,
    maintainer_name  text,
    maintainer_email text,
    description      text,
    description_md5  text,
    source           text,
    source_version   text,
    essential        text,
    depends          text,
    recommends       text,
    suggests         text,
    pre_depends      text,
    installed_size   integer,
    homepage         text,
    size             integer,
    section          text,
    priority         text,
    provides         text,
    conflicts        text,
    distribution     text not null,
    "release"        text not null,
    component        text not null,
    primary key (package, version, architecture, distribution, "release", component)
);

create index if not exists IndexPackagesPackage on packages(package);

create table if not exists packages_tags (package text not null, tag text not null);

create table if not exists packages_descriptions (
    package          text not null,
    distribution     text not null,
    "release"        text not null,
    component        text not null,
    language         text not null,
    description      text,
    long_description text
);

create table if not exists packages_lintian (
    package      text not null,
    version      text,
    architecture text,
    tag          text not null,
    tag_type     text,
    information  text
);

create table if not exists sources (
    source              text not null,
    version             text not null,
    maintainer          text,
    maintainer_name     text,
    maintainer_email    text,
    format              text,
    architecture        text,
    standards_version   text,
    homepage            text,
    build_depends       text,
    build_depends_indep text,
    vcs_type            text,
    vcs_url             text,
    vcs_browser         text,
    section             text,
    priority            text,
    distribution        text not null,
    "release"           text not null,
    component           text not null,
    primary key (source, version, distribution, "release", component)
);

create table if not exists sources_uploaders (
    source       text not null,
    version      text not null,
    distribution text not null,
    "release"    text not null,
    component    text not null,
    uploader     text,
    name         text,
    email        text
);

create table if not exists popcon (
    package text primary key not null,
    insts   integer,
    vote    integer,
    olde    integer,
    recent  integer,
    nofiles integer
);

create table if not exists popcon_src (
    source  text primary key not null,
    insts   integer,
    vote    integer,
    olde    integer,
    recent  integer,
    nofiles integer
);

create table if not exists popcon_src_average (
    source  text primary key not null,
    insts   real,
    vote    real,
    olde    real,
    recent  real,
    nofiles real
);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("release"), "\"release\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
