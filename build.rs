use std::fs;

// chatfmt embeds src/default_config.toml with include_str! and falls back to
// struct defaults if it fails to parse, so a broken file must fail the build
// instead. Both sections read by `Config` have to be present.
const REQUIRED_SECTIONS: &[&str] = &["code", "tables"];

fn main() {
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={config_path}");

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {e}"),
    };

    for section in REQUIRED_SECTIONS {
        if !table.get(*section).is_some_and(toml::Value::is_table) {
            panic!("default_config.toml is missing the [{section}] table");
        }
    }
}
