//! Title fixtures

use medoc_ingest::models::{RawObject, RawValue};
use serde_json::{json, Value};
use std::path::Path;

/// A title with a cast list, a singleton director list and assorted scalars
pub fn sample_movie(id: &str, title: &str) -> RawObject {
    RawObject::movie(id)
        .with_field("title", title)
        .with_field("year", 1999i64)
        .with_field("genres", vec!["Action", "Sci-Fi"])
        .with_field("akas", Vec::<RawValue>::new())
        .with_field(
            "cast",
            vec![
                RawObject::person("0000206").with_field("name", "Keanu Reeves"),
                RawObject::person("0005251").with_field("name", "Carrie-Anne Moss"),
            ],
        )
        .with_field(
            "director",
            vec![RawObject::person("0905154").with_field("name", "Lana Wachowski")],
        )
        .with_field(
            "distributor",
            RawObject::company("0226417").with_field("name", "Warner Bros."),
        )
}

/// Wire-format payload for [`sample_movie`]
pub fn sample_payload(id: &str, title: &str) -> Value {
    json!({
        "$kind": "movie",
        "$id": id,
        "title": title,
        "year": 1999,
        "genres": ["Action", "Sci-Fi"],
        "akas": [],
        "cast": [
            {"$kind": "person", "$id": "0000206", "name": "Keanu Reeves"},
            {"$kind": "person", "$id": "0005251", "name": "Carrie-Anne Moss"}
        ],
        "director": [{"$kind": "person", "$id": "0905154", "name": "Lana Wachowski"}],
        "distributor": {"$kind": "company", "$id": "0226417", "name": "Warner Bros."}
    })
}

/// Write `tt<id>.json` files into `dir`
pub fn write_mirror(dir: &Path, titles: &[(&str, Value)]) {
    for (id, payload) in titles {
        std::fs::write(dir.join(format!("tt{}.json", id)), payload.to_string()).unwrap();
    }
}
