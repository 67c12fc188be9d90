use serde::{Deserialize, Serialize};

/// Top-level document served by the menu endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuDocument {
    pub menu: Vec<MenuEntryNetwork>,
}

/// A menu item exactly as it appears on the wire.
///
/// Unknown fields are ignored; every listed field is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuEntryNetwork {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub category: String,
}

/// A menu item as persisted in the local cache.
///
/// `price` is kept as the decimal text the server sent so it never goes
/// through a locale-dependent float round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct MenuEntry {
    #[cfg_attr(feature = "ts", ts(type = "number"))]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub category: String,
}

impl From<MenuEntryNetwork> for MenuEntry {
    fn from(entry: MenuEntryNetwork) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            description: entry.description,
            price: entry.price,
            image: entry.image,
            category: entry.category,
        }
    }
}

impl MenuEntry {
    /// Price in cents, parsed from the decimal text.
    ///
    /// Accepts "12", "12.5" and "12.99". Anything else (signs, more than two
    /// fractional digits, stray characters) yields `None`.
    pub fn price_cents(&self) -> Option<u64> {
        let text = self.price.trim();
        let (whole, frac) = match text.split_once('.') {
            Some((w, f)) => (w, f),
            None => (text, ""),
        };

        if whole.is_empty() || frac.len() > 2 {
            return None;
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let whole: u64 = whole.parse().ok()?;
        let frac: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().ok()? * 10,
            _ => frac.parse().ok()?,
        };

        whole.checked_mul(100)?.checked_add(frac)
    }

    /// Price formatted for display, e.g. "$12.99".
    /// Falls back to the raw text when it isn't a plain decimal.
    pub fn price_display(&self) -> String {
        match self.price_cents() {
            Some(cents) => format!("${}.{:02}", cents / 100, cents % 100),
            None => self.price.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greek_salad_network() -> MenuEntryNetwork {
        MenuEntryNetwork {
            id: 1,
            title: "Greek Salad".to_string(),
            description: "The famous greek salad of crispy lettuce, peppers, olives".to_string(),
            price: "12.99".to_string(),
            image: "greek.jpg".to_string(),
            category: "starters".to_string(),
        }
    }

    fn entry_with_price(price: &str) -> MenuEntry {
        MenuEntry {
            price: price.to_string(),
            ..MenuEntry::from(greek_salad_network())
        }
    }

    #[test]
    fn test_conversion_keeps_every_field() {
        let network = greek_salad_network();
        let entry = MenuEntry::from(network.clone());

        assert_eq!(entry.id, network.id);
        assert_eq!(entry.title, network.title);
        assert_eq!(entry.description, network.description);
        assert_eq!(entry.price, "12.99");
        assert_eq!(entry.image, "greek.jpg");
        assert_eq!(entry.category, "starters");
    }

    #[test]
    fn test_document_ignores_unknown_fields() {
        let json = r#"{"menu":[{"id":2,"title":"Lemon Dessert","description":"","price":"10","image":"lemon.jpg","category":"desserts","calories":420}],"version":3}"#;

        let doc: MenuDocument = serde_json::from_str(json).expect("Failed to parse menu JSON");
        assert_eq!(doc.menu.len(), 1);
        assert_eq!(doc.menu[0].title, "Lemon Dessert");
        assert_eq!(doc.menu[0].description, "");
    }

    #[test]
    fn test_document_rejects_missing_field() {
        let json = r#"{"menu":[{"id":2,"title":"Lemon Dessert","description":"","image":"lemon.jpg","category":"desserts"}]}"#;
        assert!(serde_json::from_str::<MenuDocument>(json).is_err());
    }

    #[test]
    fn test_price_cents() {
        assert_eq!(entry_with_price("12.99").price_cents(), Some(1299));
        assert_eq!(entry_with_price("10").price_cents(), Some(1000));
        assert_eq!(entry_with_price("5.5").price_cents(), Some(550));
        assert_eq!(entry_with_price(" 7.05 ").price_cents(), Some(705));

        assert_eq!(entry_with_price("").price_cents(), None);
        assert_eq!(entry_with_price(".99").price_cents(), None);
        assert_eq!(entry_with_price("1.999").price_cents(), None);
        assert_eq!(entry_with_price("-3").price_cents(), None);
        assert_eq!(entry_with_price("12,99").price_cents(), None);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(entry_with_price("12.99").price_display(), "$12.99");
        assert_eq!(entry_with_price("8").price_display(), "$8.00");
        assert_eq!(entry_with_price("market price").price_display(), "market price");
    }
}
