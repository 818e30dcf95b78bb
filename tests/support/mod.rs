//! Shared fixture route set used by the equivalence and scenario tests.

use waytrie::record::Record;

/// The standard route set exercised across all three engines.
pub fn route_set() -> Vec<Record<&'static str>> {
    vec![
        Record::new("/", "r0"),
        Record::new("/path/to/route", "r1"),
        Record::new("/path/to/other", "r2"),
        Record::new("/path/to/route/a", "r3"),
        Record::new("/path/to/:param", "r4"),
        Record::new("/path/to/wildcard/*routepath", "r5"),
        Record::new("/path/to/:param1/:param2", "r6"),
        Record::new("/path/to/:param1/sep/:param2", "r7"),
        Record::new("/:year/:month/:day", "r8"),
        Record::new("/user/:id", "r9"),
        Record::new("/a/to/b/:param/*routepath", "r10"),
    ]
}

/// `(input path, expected value, expected params)`. `None` value means miss.
pub fn expected_lookups() -> Vec<(&'static str, Option<&'static str>, Vec<(&'static str, &'static str)>)> {
    vec![
        ("/", Some("r0"), vec![]),
        ("/path/to/route", Some("r1"), vec![]),
        ("/path/to/other", Some("r2"), vec![]),
        ("/path/to/route/a", Some("r3"), vec![]),
        ("/path/to/hoge", Some("r4"), vec![("param", "hoge")]),
        (
            "/path/to/wildcard/some/params",
            Some("r5"),
            vec![("routepath", "some/params")],
        ),
        (
            "/path/to/o1/o2",
            Some("r6"),
            vec![("param1", "o1"), ("param2", "o2")],
        ),
        (
            "/path/to/p1/sep/p2",
            Some("r7"),
            vec![("param1", "p1"), ("param2", "p2")],
        ),
        (
            "/2014/01/06",
            Some("r8"),
            vec![("year", "2014"), ("month", "01"), ("day", "06")],
        ),
        ("/user/777", Some("r9"), vec![("id", "777")]),
        (
            "/a/to/b/p1/some/wildcard/params",
            Some("r10"),
            vec![("param", "p1"), ("routepath", "some/wildcard/params")],
        ),
        ("/missing", None, vec![]),
    ]
}

pub const ENGINE_NAMES: [&str; 3] = ["double_array", "tst", "regexp"];
