// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Test fixtures for the UDD API crates.
//!
//! [`sample_db`] builds an in-memory database holding a small, internally
//! consistent slice of UDD: a few active and archived bugs with their
//! junction rows, one developer identity, the `python2.7` binary and source
//! packages, and popcon figures. One active bug deliberately blocks a bug
//! that exists in neither bug table.

use udd_store_db::{Result, UddDb, Value};

/// Active bug blocking [`BLOCKED_BUG`].
pub const BLOCKING_BUG: i64 = 24043;
/// Active bug blocked by [`BLOCKING_BUG`].
pub const BLOCKED_BUG: i64 = 638791;
/// Archived bug merged with [`MERGED_BUG`].
pub const ARCHIVED_BUG: i64 = 100000;
/// Archived bug merged with [`ARCHIVED_BUG`].
pub const MERGED_BUG: i64 = 77039;
/// Active bug whose `bugs_blocks` row points at [`MISSING_BUG`].
pub const BROKEN_BUG: i64 = 500000;
/// Bug id present in no bug table.
pub const MISSING_BUG: i64 = 999999;

pub const ARCHIVED_BUG_TITLE: &str = "xlibs: [xkb] Another alt keys not -> meta keysyms report";

/// Developer id of `jamessan`.
pub const JAMESSAN: i64 = 1026;

/// Create an in-memory database populated with the sample rows.
///
/// # Panics
/// Panics if the database cannot be created; this is test-only code.
pub fn sample_db() -> UddDb {
    let db = UddDb::open_memory().expect("Failed to create in-memory database");
    populate(&db).expect("Failed to insert fixture rows");
    db
}

/// Insert the sample rows into an existing database with the UDD schema.
pub fn populate(db: &UddDb) -> Result<()> {
    insert_bugs(db)?;
    insert_developers(db)?;
    insert_packages(db)?;
    insert_sources(db)?;
    insert_popcon(db)?;
    Ok(())
}

fn text(s: &str) -> Value {
    Value::from(s)
}

fn int(i: i64) -> Value {
    Value::Integer(i)
}

fn bug(id: i64, package: &str, severity: &str, title: &str, done: Option<&str>) -> Vec<Value> {
    vec![
        int(id),
        text(package),
        text(package),
        text("2004-02-12 10:33:02"),
        text(if done.is_some() { "done" } else { "pending" }),
        text(severity),
        text("Reporter <reporter@example.org>"),
        text("Reporter"),
        text("reporter@example.org"),
        Value::Null,
        Value::Null,
        Value::Null,
        done.into(),
        done.map(|_| "Maintainer").into(),
        done.map(|_| "maintainer@example.org").into(),
        done.map(|_| "2005-06-01 12:00:00").into(),
        text(title),
        text("2012-07-09 15:41:00"),
        Value::Null,
        int(0),
        int(0),
        int(i64::from(done.is_none())),
        int(i64::from(done.is_none())),
        int(0),
    ]
}

fn insert_bugs(db: &UddDb) -> Result<()> {
    db.insert_many(
        "bugs",
        &[
            bug(
                BLOCKING_BUG,
                "vim",
                "wishlist",
                "vim: please support the xterm bracketed paste mode",
                None,
            ),
            bug(BLOCKED_BUG, "vim", "normal", "vim: crash on startup with -X", None),
            bug(BROKEN_BUG, "vim", "minor", "vim: blocks a purged bug", None),
        ],
    )?;
    db.insert_many(
        "archived_bugs",
        &[
            bug(
                ARCHIVED_BUG,
                "xlibs",
                "normal",
                ARCHIVED_BUG_TITLE,
                Some("Maintainer <maintainer@example.org>"),
            ),
            bug(
                MERGED_BUG,
                "xlibs",
                "normal",
                "xlibs: alt keys do not map to meta",
                Some("Maintainer <maintainer@example.org>"),
            ),
        ],
    )?;

    db.insert("bugs_blocks", &[int(BLOCKING_BUG), int(BLOCKED_BUG)])?;
    db.insert("bugs_blocks", &[int(BROKEN_BUG), int(MISSING_BUG)])?;
    db.insert("bugs_blockedby", &[int(BLOCKED_BUG), int(BLOCKING_BUG)])?;
    db.insert_many(
        "bugs_tags",
        &[
            vec![int(BLOCKING_BUG), text("patch")],
            vec![int(BLOCKING_BUG), text("upstream")],
        ],
    )?;
    db.insert(
        "bugs_usertags",
        &[text("debian-qa@lists.debian.org"), text("goal-paste"), int(BLOCKING_BUG)],
    )?;
    db.insert(
        "bugs_packages",
        &[int(BLOCKING_BUG), text("vim"), text("vim")],
    )?;
    db.insert("bugs_found_in", &[int(BLOCKED_BUG), text("2:7.3.547-4")])?;

    db.insert("archived_bugs_merged_with", &[int(ARCHIVED_BUG), int(MERGED_BUG)])?;
    db.insert("archived_bugs_merged_with", &[int(MERGED_BUG), int(ARCHIVED_BUG)])?;
    db.insert("archived_bugs_found_in", &[int(ARCHIVED_BUG), text("4.3.0.dfsg.1-10")])?;
    db.insert("archived_bugs_fixed_in", &[int(ARCHIVED_BUG), text("6.8.2-1")])?;
    db.insert(
        "archived_bugs_packages",
        &[int(ARCHIVED_BUG), text("xlibs"), text("xfree86")],
    )?;
    // Usertags on an archived bug are never served.
    db.insert(
        "bugs_usertags",
        &[text("debian-x@lists.debian.org"), text("xkb"), int(ARCHIVED_BUG)],
    )?;
    Ok(())
}

fn insert_developers(db: &UddDb) -> Result<()> {
    db.insert("carnivore_login", &[int(JAMESSAN), text("jamessan")])?;
    db.insert("carnivore_login", &[int(42), text("zack")])?;
    db.insert_many(
        "carnivore_emails",
        &[
            vec![int(JAMESSAN), text("jamessan@debian.org")],
            vec![int(JAMESSAN), text("vega.james@gmail.com")],
            vec![int(JAMESSAN), text("jamessan@jamessan.com")],
            vec![int(42), text("zack@debian.org")],
        ],
    )?;
    db.insert_many(
        "carnivore_names",
        &[
            vec![int(JAMESSAN), text("James McCoy")],
            vec![int(JAMESSAN), text("James Vega")],
            vec![int(42), text("Stefano Zacchiroli")],
        ],
    )?;
    db.insert(
        "carnivore_keys",
        &[int(JAMESSAN), text("0x91BFBF4D6956BD5DF7B72D23DFE691AE331BA3DB"), text("keyring")],
    )?;
    Ok(())
}

fn binary(package: &str, version: &str, architecture: &str, source: &str) -> Vec<Value> {
    vec![
        text(package),
        text(version),
        text(architecture),
        text("Matthias Klose <doko@debian.org>"),
        text("Matthias Klose"),
        text("doko@debian.org"),
        text("Interactive high-level object-oriented language"),
        text("5ad64d4f5a5ad4f5e0cdd65ba7b7f8d4"),
        text(source),
        text(version),
        Value::Null,
        text("libc6 (>= 2.3.6-6~)"),
        text("mime-support"),
        text("python2.7-doc"),
        Value::Null,
        int(9868),
        text("http://www.python.org/"),
        int(2_632_546),
        text("python"),
        text("optional"),
        Value::Null,
        Value::Null,
        text("debian"),
        text("sid"),
        text("main"),
    ]
}

fn insert_packages(db: &UddDb) -> Result<()> {
    db.insert_many(
        "packages",
        &[
            binary("python2.7", "2.7.3-1", "i386", "python2.7"),
            binary("python2.7", "2.7.3-1", "ia64", "python2.7"),
            binary("python2.7", "2.7.3-1", "amd64", "python2.7"),
            binary("vim", "2:7.3.547-4", "amd64", "vim"),
        ],
    )?;
    db.insert_many(
        "packages_tags",
        &[
            vec![text("python2.7"), text("devel::interpreter")],
            vec![text("python2.7"), text("role::program")],
        ],
    )?;
    db.insert_many(
        "packages_descriptions",
        &[
            vec![
                text("python2.7"),
                text("debian"),
                text("sid"),
                text("main"),
                text("en"),
                text("Interactive high-level object-oriented language (version 2.7)"),
                text("Python is a high-level, interactive, object-oriented language."),
            ],
            vec![
                text("python2.7"),
                text("debian"),
                text("sid"),
                text("main"),
                text("de"),
                text("Interaktive objektorientierte Skriptsprache (Version 2.7)"),
                text("Python ist eine interaktive, objektorientierte Skriptsprache."),
            ],
        ],
    )?;
    db.insert_many(
        "packages_lintian",
        &[
            vec![
                text("python2.7"),
                text("2.7.3-1"),
                text("i386"),
                text("binary-without-manpage"),
                text("W"),
                text("usr/bin/python2.7-config"),
            ],
            vec![
                text("python2.7"),
                text("2.7.3-1"),
                text("amd64"),
                text("embedded-library"),
                text("E"),
                text("usr/lib/python2.7/lib-dynload/pyexpat.so: expat"),
            ],
            vec![
                text("python2.7"),
                text("2.7.2-1"),
                text("i386"),
                text("outdated-autotools-helper-file"),
                text("W"),
                text("config.guess 2009-12-30"),
            ],
        ],
    )?;
    Ok(())
}

fn insert_sources(db: &UddDb) -> Result<()> {
    db.insert(
        "sources",
        &[
            text("python2.7"),
            text("2.7.3-1"),
            text("Matthias Klose <doko@debian.org>"),
            text("Matthias Klose"),
            text("doko@debian.org"),
            text("3.0 (quilt)"),
            text("any all"),
            text("3.9.3"),
            text("http://www.python.org/"),
            text("debhelper (>= 5), autoconf"),
            text("python-sphinx"),
            text("Hg"),
            text("http://hg.python.org/cpython"),
            Value::Null,
            text("python"),
            text("optional"),
            text("debian"),
            text("sid"),
            text("main"),
        ],
    )?;
    db.insert(
        "sources_uploaders",
        &[
            text("python2.7"),
            text("2.7.3-1"),
            text("debian"),
            text("sid"),
            text("main"),
            text("Scott Kitterman <scott@kitterman.com>"),
            text("Scott Kitterman"),
            text("scott@kitterman.com"),
        ],
    )?;
    Ok(())
}

fn insert_popcon(db: &UddDb) -> Result<()> {
    db.insert_many(
        "popcon",
        &[
            vec![text("python2.7"), int(151_212), int(98_004), int(43_114), int(10_043), int(51)],
            vec![text("vim"), int(120_000), int(40_000), int(60_000), int(19_000), int(1_000)],
        ],
    )?;
    db.insert(
        "popcon_src",
        &[text("python2.7"), int(151_212), int(98_004), int(43_114), int(10_043), int(51)],
    )?;
    db.insert(
        "popcon_src_average",
        &[
            text("python2.7"),
            Value::Real(37_803.0),
            Value::Real(24_501.0),
            Value::Real(10_778.5),
            Value::Real(2_510.75),
            Value::Real(12.75),
        ],
    )?;
    Ok(())
}
