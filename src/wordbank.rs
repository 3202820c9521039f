use include_dir::{include_dir, Dir};
use serde::Deserialize;

static LISTS_DIR: Dir = include_dir!("src/wordlists");

/// A named word list embedded at build time.
#[derive(Deserialize, Clone, Debug)]
pub struct WordBank {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordBank {
    /// Loads an embedded list by name; `None` when no such list is compiled in
    /// or its JSON does not parse.
    pub fn load(name: &str) -> Option<Self> {
        let file = LISTS_DIR.get_file(format!("{name}.json"))?;
        let contents = file.contents_utf8()?;
        serde_json::from_str(contents).ok()
    }

    /// Names of every embedded list, for CLI error messages.
    pub fn names() -> Vec<String> {
        LISTS_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .filter_map(|s| s.to_str())
            .map(str::to_string)
            .collect()
    }
}
