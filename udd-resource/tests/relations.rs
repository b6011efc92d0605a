// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Computed fields resolved through junction tables.

use std::sync::Arc;

use udd_resource::catalog::{
    ACTIVE_BUGS, ARCHIVED_BUGS, BUGS, DEVELOPERS, PACKAGES, SOURCES, SUBPACKAGES,
};
use udd_resource::{Error, Filters, Resource, Udd};
use udd_store_db::Value;
use udd_utils_test::{
    ARCHIVED_BUG, ARCHIVED_BUG_TITLE, BLOCKED_BUG, BLOCKING_BUG, BROKEN_BUG, JAMESSAN,
    MERGED_BUG, sample_db,
};

fn udd() -> Udd {
    Udd::new(sample_db()).unwrap()
}

fn get(udd: &Udd, path: &str, key: &[Value]) -> Arc<Resource> {
    let ty = udd.resolve(path).unwrap();
    udd.get(&ty, key).unwrap()
}

fn strings(values: &[Value]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[test]
fn test_merged_with_resolves_archived_bug() {
    let udd = udd();
    let bug = get(&udd, BUGS, &[ARCHIVED_BUG.into()]);
    assert_eq!(bug.get("title"), Some(&Value::from(ARCHIVED_BUG_TITLE)));

    let merged = udd.computed(&bug, "merged_with").unwrap();
    let objects = merged.as_objects().unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].key(), &[Value::Integer(MERGED_BUG)]);
    assert_eq!(objects[0].path(), ARCHIVED_BUGS);

    // Linked instances share identity with direct fetches.
    let direct = get(&udd, ARCHIVED_BUGS, &[MERGED_BUG.into()]);
    assert!(Arc::ptr_eq(&objects[0], &direct));
}

#[test]
fn test_blocks_and_blockedby() {
    let udd = udd();
    let blocking = get(&udd, ACTIVE_BUGS, &[BLOCKING_BUG.into()]);
    let blocked = get(&udd, ACTIVE_BUGS, &[BLOCKED_BUG.into()]);

    let blocks = udd.computed(&blocking, "blocks").unwrap();
    assert!(Arc::ptr_eq(&blocks.as_objects().unwrap()[0], &blocked));

    let blockedby = udd.computed(&blocked, "blockedby").unwrap();
    assert!(Arc::ptr_eq(&blockedby.as_objects().unwrap()[0], &blocking));

    // Linking resolves keys only; the target's own fields stay lazy.
    assert!(!blocked.is_cached("blocks"));
}

#[test]
fn test_dangling_junction_row_is_corruption() {
    let udd = udd();
    for path in [BUGS, ACTIVE_BUGS] {
        let bug = get(&udd, path, &[BROKEN_BUG.into()]);
        let err = udd.computed(&bug, "blocks").unwrap_err();
        assert!(
            matches!(err, Error::CorruptedDatabase { relation: "blocks", .. }),
            "{err}"
        );
        assert!(!err.is_not_found());
        assert!(!bug.is_cached("blocks"));
    }
}

#[test]
fn test_computed_field_queried_once() {
    let udd = udd();
    let bug = get(&udd, BUGS, &[BLOCKING_BUG.into()]);

    let before = udd.db().query_count();
    let first = udd.computed(&bug, "tags").unwrap();
    let after_first = udd.db().query_count();
    assert!(after_first > before);

    let second = udd.computed(&bug, "tags").unwrap();
    assert_eq!(udd.db().query_count(), after_first);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(strings(first.as_scalars().unwrap()), vec!["patch", "upstream"]);
}

#[test]
fn test_concurrent_access_queries_once() {
    let udd = udd();
    let bug = get(&udd, ACTIVE_BUGS, &[BLOCKING_BUG.into()]);

    let before = udd.db().query_count();
    let results = std::thread::scope(|scope| {
        let handles = (0..8)
            .map(|_| scope.spawn(|| udd.computed(&bug, "tags").unwrap()))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(udd.db().query_count() - before, 1);
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
}

#[test]
fn test_multi_table_relation_concatenates() {
    let udd = udd();
    let bug = get(&udd, BUGS, &[BLOCKING_BUG.into()]);

    // One query per backing table's junction.
    let before = udd.db().query_count();
    let packages = udd.computed(&bug, "packages").unwrap();
    assert_eq!(udd.db().query_count() - before, 2);
    assert_eq!(
        packages.as_tuples().unwrap(),
        &[vec![Value::from("vim"), Value::from("vim")]]
    );
}

#[test]
fn test_versions() {
    let udd = udd();
    let bug = get(&udd, ARCHIVED_BUGS, &[ARCHIVED_BUG.into()]);
    let found_in = udd.computed(&bug, "found_in").unwrap();
    let fixed_in = udd.computed(&bug, "fixed_in").unwrap();
    assert_eq!(strings(found_in.as_scalars().unwrap()), vec!["4.3.0.dfsg.1-10"]);
    assert_eq!(strings(fixed_in.as_scalars().unwrap()), vec!["6.8.2-1"]);
}

#[test]
fn test_usertags() {
    let udd = udd();

    let active = get(&udd, BUGS, &[BLOCKING_BUG.into()]);
    let usertags = udd.computed(&active, "usertags").unwrap();
    assert_eq!(
        usertags.as_tuples().unwrap(),
        &[vec![
            Value::from("debian-qa@lists.debian.org"),
            Value::from("goal-paste")
        ]]
    );

    // bugs_usertags has a row for the archived bug, which is never served.
    for path in [BUGS, ARCHIVED_BUGS] {
        let archived = get(&udd, path, &[ARCHIVED_BUG.into()]);
        let before = udd.db().query_count();
        let usertags = udd.computed(&archived, "usertags").unwrap();
        assert!(usertags.is_empty());
        assert_eq!(udd.db().query_count(), before);
    }
}

#[test]
fn test_developer_by_login() {
    let udd = udd();
    let developers = udd.resolve(DEVELOPERS).unwrap();

    let filters = Filters::from([("login".to_owned(), "jamessan".to_owned())]);
    let found = udd.filter(&developers, &filters).unwrap();
    assert_eq!(found.len(), 1);
    let jamessan = &found[0];
    let by_key = udd.get(&developers, jamessan.key()).unwrap();
    assert!(Arc::ptr_eq(jamessan, &by_key));
    assert_eq!(jamessan.key(), &[Value::Integer(JAMESSAN)]);

    let emails = udd.computed(jamessan, "emails").unwrap();
    assert_eq!(emails.len(), 3);
    let names = udd.computed(jamessan, "names").unwrap();
    assert_eq!(
        strings(names.as_scalars().unwrap()),
        vec!["James McCoy", "James Vega"]
    );
    let keys = udd.computed(jamessan, "keys").unwrap();
    assert_eq!(keys.as_tuples().unwrap()[0][1], Value::from("keyring"));
}

#[test]
fn test_subpackages_match_filter() {
    let udd = udd();
    let package = get(&udd, PACKAGES, &["python2.7".into()]);

    let subpackages = udd.computed(&package, "subpackages").unwrap();
    let linked = subpackages.as_objects().unwrap();

    let ty = udd.resolve(SUBPACKAGES).unwrap();
    let filters = Filters::from([("package".to_owned(), "python2.7".to_owned())]);
    let filtered = udd.filter(&ty, &filters).unwrap();

    assert_eq!(linked.len(), filtered.len());
    assert!(linked.iter().zip(&filtered).all(|(a, b)| Arc::ptr_eq(a, b)));
    assert!(
        linked
            .iter()
            .any(|s| s.get("architecture") == Some(&Value::from("i386")))
    );

    let tags = udd.computed(&package, "tags").unwrap();
    assert_eq!(
        strings(tags.as_scalars().unwrap()),
        vec!["devel::interpreter", "role::program"]
    );
}

fn python_build(udd: &Udd, architecture: &str) -> Arc<Resource> {
    let key = ["python2.7", "2.7.3-1", architecture, "debian", "sid", "main"].map(Value::from);
    get(udd, SUBPACKAGES, &key)
}

#[test]
fn test_descriptions_keyed_by_language() {
    let udd = udd();
    let sub = python_build(&udd, "i386");

    let descriptions = udd.computed(&sub, "descriptions").unwrap();
    let keyed = descriptions.as_keyed().unwrap();
    assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["de", "en"]);
    assert_eq!(
        keyed["en"][0],
        Value::from("Interactive high-level object-oriented language (version 2.7)")
    );
    assert_eq!(keyed["en"].len(), 2);
}

#[test]
fn test_duplicate_description_keeps_first_row() {
    let udd = udd();
    udd.db()
        .insert(
            "packages_descriptions",
            &[
                Value::from("python2.7"),
                Value::from("debian"),
                Value::from("sid"),
                Value::from("main"),
                Value::from("en"),
                Value::from("Python 2.7"),
                Value::from("A later translation row for the same language."),
            ],
        )
        .unwrap();

    let descriptions = udd
        .computed(&python_build(&udd, "i386"), "descriptions")
        .unwrap();
    let keyed = descriptions.as_keyed().unwrap();
    assert_eq!(keyed.len(), 2);
    assert_eq!(
        keyed["en"][0],
        Value::from("Interactive high-level object-oriented language (version 2.7)")
    );
}

#[test]
fn test_lintian_filtered_by_version_and_architecture() {
    let udd = udd();

    let i386 = udd.computed(&python_build(&udd, "i386"), "lintian").unwrap();
    assert_eq!(
        i386.as_tuples().unwrap(),
        &[vec![
            Value::from("binary-without-manpage"),
            Value::from("W"),
            Value::from("usr/bin/python2.7-config"),
        ]]
    );

    let amd64 = udd.computed(&python_build(&udd, "amd64"), "lintian").unwrap();
    assert_eq!(amd64.as_tuples().unwrap()[0][0], Value::from("embedded-library"));

    let ia64 = udd.computed(&python_build(&udd, "ia64"), "lintian").unwrap();
    assert!(ia64.is_empty());
}

#[test]
fn test_uploaders() {
    let udd = udd();
    let key = ["python2.7", "2.7.3-1", "debian", "sid", "main"].map(Value::from);
    let source = get(&udd, SOURCES, &key);

    let uploaders = udd.computed(&source, "uploaders").unwrap();
    assert_eq!(
        strings(&uploaders.as_tuples().unwrap()[0]),
        vec![
            "Scott Kitterman <scott@kitterman.com>",
            "Scott Kitterman",
            "scott@kitterman.com"
        ]
    );
}

#[test]
fn test_unknown_computed_field() {
    let udd = udd();
    let bug = get(&udd, BUGS, &[BLOCKING_BUG.into()]);
    let err = udd.computed(&bug, "title").unwrap_err();
    assert!(matches!(err, Error::UnknownComputedField { .. }));
}

#[test]
fn test_computed_all_in_declared_order() {
    let udd = udd();
    let bug = get(&udd, ACTIVE_BUGS, &[BLOCKING_BUG.into()]);
    let names = udd
        .computed_all(&bug)
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "blocks",
            "blockedby",
            "merged_with",
            "fixed_in",
            "found_in",
            "tags",
            "usertags",
            "packages"
        ]
    );
}

#[test]
fn test_references_serialize_primary_key_only() {
    let udd = udd();
    let bug = get(&udd, BUGS, &[ARCHIVED_BUG.into()]);
    let merged = udd.computed(&bug, "merged_with").unwrap();
    assert_eq!(
        serde_json::to_value(&*merged).unwrap(),
        serde_json::json!([{ "id": MERGED_BUG }])
    );

    let package = get(&udd, PACKAGES, &["python2.7".into()]);
    let subpackages = udd.computed(&package, "subpackages").unwrap();
    let json = serde_json::to_value(&*subpackages).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 3);
    assert_eq!(json[0].as_object().unwrap().len(), 6);
}
