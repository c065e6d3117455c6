#[test]
fn vst() {
    trycmd::TestCases::new()
        .case("tests/cmd/*.toml")
        .default_bin_name("vst");
}
