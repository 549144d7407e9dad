//! Keyword knowledge base for canned support answers.
//!
//! An ordered list of (keyword, response) pairs plus a default response.
//! Matching is case-insensitive substring containment and the first keyword
//! in table order wins, so the table is a `Vec` and never a map.

use crate::error::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};

/// One keyword and the answer it triggers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub keyword: String,
    pub response: String,
}

impl KnowledgeEntry {
    pub fn new(keyword: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            response: response.into(),
        }
    }
}

const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    (
        "shipping",
        "We offer free standard shipping on orders over $50. Standard shipping takes 3-5 business days. Express shipping (1-2 business days) is available for $9.99, and overnight shipping is available for $19.99.",
    ),
    (
        "return",
        "Our return policy allows you to return items within 30 days of purchase. Items must be unworn, unwashed, and in original packaging with tags attached. You can initiate a return through your account or contact customer service.",
    ),
    (
        "refund",
        "Refunds are processed within 5-7 business days after we receive your returned item. The refund will be credited to your original payment method. You will receive an email confirmation once the refund is processed.",
    ),
    (
        "payment",
        "We accept all major credit cards (Visa, MasterCard, American Express, Discover), PayPal, Apple Pay, Google Pay, and Afterpay for installment payments.",
    ),
    (
        "order",
        "To check your order status, please log into your account and visit \"My Orders\". You can also use the order tracking link sent to your email. If you need further assistance, please provide your order number.",
    ),
    (
        "delivery",
        "Delivery times vary by shipping method: Standard (3-5 business days), Express (1-2 business days), Overnight (next business day). Please note that orders placed after 2 PM EST will be processed the next business day.",
    ),
    (
        "cancel",
        "Orders can be cancelled within 1 hour of placing them. After that, please contact our customer service team. If your order has already shipped, you will need to follow our return process once you receive the items.",
    ),
    (
        "contact",
        "You can reach our customer service team via email at support@example.com, by phone at 1-800-555-0199, or through this chat service. Our team is available Monday-Friday 9 AM - 8 PM EST and Saturday-Sunday 10 AM - 6 PM EST.",
    ),
    (
        "size",
        "We offer a detailed size guide on each product page. We recommend measuring yourself and comparing with our size chart. If you receive an item that doesn't fit, you can exchange it for a different size within 30 days.",
    ),
    (
        "stock",
        "If an item is out of stock, you can sign up for restock notifications on the product page. We'll email you as soon as it becomes available again. Popular items are typically restocked within 2-3 weeks.",
    ),
    (
        "discount",
        "We offer various promotions throughout the year. Sign up for our newsletter to receive exclusive discounts and early access to sales. Current promotions are displayed on our homepage and in the \"Sale\" section.",
    ),
];

/// Answer given when no keyword matches
pub const DEFAULT_RESPONSE: &str = "I'm here to help! I can assist you with questions about shipping, returns, refunds, payments, order tracking, delivery, cancellations, sizing, stock availability, and discounts. What would you like to know more about?";

/// Ordered keyword table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    default_response: String,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    /// The e-commerce table shipped with the desk
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES
                .iter()
                .map(|(k, r)| KnowledgeEntry::new(*k, *r))
                .collect(),
            default_response: DEFAULT_RESPONSE.to_string(),
        }
    }

    /// Build a table from configured entries, keeping their order.
    ///
    /// Keywords are lower-cased; blank keywords are rejected since they
    /// would match every input.
    pub fn from_entries(
        entries: Vec<KnowledgeEntry>,
        default_response: impl Into<String>,
    ) -> DeskResult<Self> {
        let mut normalized = Vec::with_capacity(entries.len());
        for (i, entry) in entries.into_iter().enumerate() {
            let keyword = entry.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                return Err(DeskError::Config(format!(
                    "knowledge entry {} has an empty keyword",
                    i + 1
                )));
            }
            normalized.push(KnowledgeEntry::new(keyword, entry.response));
        }

        Ok(Self {
            entries: normalized,
            default_response: default_response.into(),
        })
    }

    /// First entry whose keyword occurs in the input, in table order
    pub fn find_match(&self, input: &str) -> Option<&KnowledgeEntry> {
        let lower = input.to_lowercase();
        self.entries.iter().find(|e| lower.contains(e.keyword.as_str()))
    }

    /// Canned answer for the input. Total: falls back to the default response.
    pub fn respond(&self, input: &str) -> &str {
        self.find_match(input)
            .map(|e| e.response.as_str())
            .unwrap_or(&self.default_response)
    }

    /// Keywords in table order
    pub fn keywords(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.keyword.as_str()).collect()
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_for(kb: &KnowledgeBase, keyword: &str) -> String {
        kb.entries()
            .iter()
            .find(|e| e.keyword == keyword)
            .map(|e| e.response.clone())
            .unwrap()
    }

    #[test]
    fn test_builtin_table_order() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(
            kb.keywords(),
            vec![
                "shipping", "return", "refund", "payment", "order", "delivery", "cancel",
                "contact", "size", "stock", "discount"
            ]
        );
    }

    #[test]
    fn test_first_keyword_in_table_wins() {
        let kb = KnowledgeBase::builtin();
        let answer = kb.respond("What is your return and refund policy");
        assert_eq!(answer, response_for(&kb, "return"));
        assert_ne!(answer, response_for(&kb, "refund"));
    }

    #[test]
    fn test_table_order_beats_input_order() {
        let kb = KnowledgeBase::builtin();
        // "refund" appears first in the text, "return" first in the table
        let answer = kb.respond("refund or return?");
        assert_eq!(answer, response_for(&kb, "return"));
    }

    #[test]
    fn test_case_insensitive() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.respond("SHIPPING cost?"), response_for(&kb, "shipping"));
    }

    #[test]
    fn test_substring_not_word_match() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.respond("what a disorder"), response_for(&kb, "order"));
    }

    #[test]
    fn test_no_match_returns_default() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.respond("hello there"), DEFAULT_RESPONSE);
        assert_eq!(kb.respond(""), DEFAULT_RESPONSE);
    }

    #[test]
    fn test_order_question_matches_order() {
        let kb = KnowledgeBase::builtin();
        let entry = kb.find_match("Where is my order #123").unwrap();
        assert_eq!(entry.keyword, "order");
    }

    #[test]
    fn test_custom_entries_keep_order_and_lowercase() {
        let kb = KnowledgeBase::from_entries(
            vec![
                KnowledgeEntry::new("Warranty", "two years"),
                KnowledgeEntry::new("war", "peace"),
            ],
            "ask again",
        )
        .unwrap();

        assert_eq!(kb.keywords(), vec!["warranty", "war"]);
        assert_eq!(kb.respond("WARRANTY claim"), "two years");
        assert_eq!(kb.respond("star wars"), "peace");
        assert_eq!(kb.respond("nothing"), "ask again");
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let result = KnowledgeBase::from_entries(vec![KnowledgeEntry::new("  ", "x")], "d");
        assert!(matches!(result, Err(DeskError::Config(_))));
    }
}
