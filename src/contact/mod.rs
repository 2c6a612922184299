//! WhatsApp enquiry links.

use crate::models::Listing;

/// Builds pre-filled `wa.me` links to the dealer's number.
#[derive(Debug, Clone)]
pub struct ContactDispatcher {
    phone: String,
}

impl ContactDispatcher {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
        }
    }

    /// Enquiry text for a listing.
    pub fn message(listing: &Listing) -> String {
        format!(
            "Hello! Interested in the {} {} (₦{}).",
            listing.year_label(),
            listing.name,
            listing.price
        )
    }

    /// Deep link opening a chat with the dealer, message pre-filled.
    pub fn deep_link(&self, listing: &Listing) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.phone,
            urlencoding::encode(&Self::message(listing))
        )
    }
}
