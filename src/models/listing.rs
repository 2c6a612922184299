//! Listing model matching the `cars` table.

use serde::{Deserialize, Deserializer, Serialize};

/// Shown on cards whose photo is missing.
pub const FALLBACK_IMAGE_URL: &str = "https://via.placeholder.com/400x300?text=Image+Not+Found";

/// Vehicle condition label.
///
/// The table stores free text; anything outside the three dealer labels is
/// kept verbatim as `Other`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    #[default]
    Tokunbo,
    NigerianUsed,
    BrandNew,
    Other(String),
}

impl Condition {
    /// The labels offered by the editor, in display order.
    pub const OPTIONS: [Condition; 3] = [
        Condition::Tokunbo,
        Condition::NigerianUsed,
        Condition::BrandNew,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Condition::Tokunbo => "Tokunbo",
            Condition::NigerianUsed => "Nigerian Used",
            Condition::BrandNew => "Brand New",
            Condition::Other(label) => label,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "Tokunbo" => Condition::Tokunbo,
            "Nigerian Used" => Condition::NigerianUsed,
            "Brand New" => Condition::BrandNew,
            other => Condition::Other(other.to_string()),
        }
    }
}

impl From<String> for Condition {
    fn from(s: String) -> Self {
        Condition::parse(&s)
    }
}

impl From<Condition> for String {
    fn from(c: Condition) -> Self {
        c.as_str().to_string()
    }
}

/// A vehicle in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub price: String,
    #[serde(default, deserialize_with = "text_or_int")]
    pub year: Option<i32>,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
}

impl Listing {
    /// Photo to display, falling back to the placeholder when none was uploaded.
    pub fn display_image(&self) -> &str {
        if self.image_url.trim().is_empty() {
            FALLBACK_IMAGE_URL
        } else {
            &self.image_url
        }
    }

    /// Model year as display text; empty when the column is null.
    pub fn year_label(&self) -> String {
        self.year.map(|y| y.to_string()).unwrap_or_default()
    }
}

/// Row inserted by the listing editor.
///
/// `year` is forwarded exactly as typed; the table's column type decides
/// whether it is acceptable.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewListing {
    pub name: String,
    pub price: String,
    pub year: String,
    pub condition: Condition,
    pub image_url: String,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Text(s)) => s,
        Some(TextOrNumber::Int(n)) => n.to_string(),
        Some(TextOrNumber::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Year columns may be integer or text; anything unparseable reads as no year.
fn text_or_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrInt {
        Int(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<TextOrInt>::deserialize(deserializer)? {
        Some(TextOrInt::Int(n)) => i32::try_from(n).ok(),
        Some(TextOrInt::Text(s)) => s.trim().parse().ok(),
        Some(TextOrInt::Other(_)) | None => None,
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_condition_labels() {
        assert_eq!(Condition::parse("Nigerian Used"), Condition::NigerianUsed);
        assert_eq!(Condition::BrandNew.as_str(), "Brand New");
        assert_eq!(
            Condition::parse("Foreign Used"),
            Condition::Other("Foreign Used".to_string())
        );
    }

    #[test]
    fn test_listing_from_remote_row() {
        let listing: Listing = serde_json::from_value(json!({
            "id": 7,
            "name": "Camry",
            "price": 9500000,
            "year": 2019,
            "condition": "Tokunbo",
            "image_url": null,
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(listing.id, 7);
        assert_eq!(listing.price, "9500000");
        assert_eq!(listing.year, Some(2019));
        assert_eq!(listing.condition, Condition::Tokunbo);
        assert_eq!(listing.image_url, "");
        assert_eq!(listing.display_image(), FALLBACK_IMAGE_URL);
    }

    #[test]
    fn test_text_price_is_kept_verbatim() {
        let listing: Listing = serde_json::from_value(json!({
            "id": 1,
            "name": "Corolla",
            "price": "4,200,000",
            "year": null,
            "condition": "Brand New",
            "image_url": "https://cdn.example/corolla.jpg"
        }))
        .unwrap();

        assert_eq!(listing.price, "4,200,000");
        assert_eq!(listing.year_label(), "");
        assert_eq!(listing.display_image(), "https://cdn.example/corolla.jpg");
    }

    #[test]
    fn test_text_and_numeric_years_decode_together() {
        let rows: Vec<Listing> = serde_json::from_value(json!([
            { "id": 3, "name": "Venza", "price": "7,000,000", "year": "2019", "condition": "Tokunbo", "image_url": "" },
            { "id": 2, "name": "Camry", "price": "9,500,000", "year": 2015, "condition": "Tokunbo", "image_url": "" },
            { "id": 1, "name": "Corolla", "price": "4,200,000", "year": "", "condition": "Tokunbo", "image_url": "" },
            { "id": 0, "name": "Sienna", "price": "5,000,000", "year": "new", "condition": "Tokunbo", "image_url": "" }
        ]))
        .unwrap();

        let years: Vec<Option<i32>> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![Some(2019), Some(2015), None, None]);
        assert_eq!(rows[2].year_label(), "");
    }

    #[test]
    fn test_new_listing_wire_shape() {
        let row = NewListing {
            name: "Highlander".into(),
            price: "21,000,000".into(),
            year: "2021".into(),
            condition: Condition::NigerianUsed,
            image_url: String::new(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["condition"], "Nigerian Used");
        assert_eq!(value["year"], "2021");
        assert_eq!(value["image_url"], "");
    }
}
