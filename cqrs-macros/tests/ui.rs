#[test]
fn ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/command_basic.rs");
    t.pass("tests/ui/command_serde.rs");
    t.pass("tests/ui/query_basic.rs");
}
