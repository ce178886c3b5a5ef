use std::fs::File;
use std::path::Path;

pub fn deserialize_feed_file<T>(path: &Path) -> Result<Vec<T>, std::io::Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path)?;
    Ok(csv::Reader::from_reader(file)
        .deserialize()
        .filter_map(Result::ok)
        .collect::<Vec<T>>())
}

/// Like [`deserialize_feed_file`] but treats a missing file as an empty
/// table. Pathways and transfers are optional in most feeds.
pub fn deserialize_optional_file<T>(path: &Path) -> Result<Vec<T>, std::io::Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    if path.exists() {
        deserialize_feed_file(path)
    } else {
        Ok(Vec::new())
    }
}
