#[test]
fn derive_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/modkit_error_pass.rs");
    t.pass("tests/ui/modkit_error_context.rs");
    t.compile_fail("tests/ui/modkit_error_tuple_variant.rs");
    t.compile_fail("tests/ui/modkit_error_no_context.rs");
    t.compile_fail("tests/ui/model_bad_triplet.rs");
}
