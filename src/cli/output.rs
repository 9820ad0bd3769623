use serde::Serialize;

use crate::model::item::Item;

#[derive(Serialize)]
pub struct ItemJson {
    /// 1-based position in the full list
    pub position: usize,
    pub item: String,
}

#[derive(Serialize)]
pub struct ConfigJson {
    pub config_path: String,
    pub namespace: String,
    pub key: String,
    pub data_dir: String,
    pub show_key_hints: bool,
}

pub fn item_to_json(index: usize, item: &Item) -> ItemJson {
    ItemJson {
        position: index + 1,
        item: item.as_str().to_string(),
    }
}

/// One list row: right-aligned position, two spaces, item.
pub fn format_item_line(index: usize, item: &Item) -> String {
    format!("{:>3}  {}", index + 1, item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_line_is_one_based() {
        let item = Item::parse("Milk").unwrap();
        assert_eq!(format_item_line(0, &item), "  1  milk");
        assert_eq!(format_item_line(11, &item), " 12  milk");
    }

    #[test]
    fn item_json_shape() {
        let item = Item::parse("Bread").unwrap();
        let json = serde_json::to_string(&item_to_json(2, &item)).unwrap();
        assert_eq!(json, r#"{"position":3,"item":"bread"}"#);
    }
}
