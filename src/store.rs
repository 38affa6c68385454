//! In-memory message store for one extraction run.
//!
//! [`MessageStore`] is append-only. It answers the two questions the
//! writers ask: "all messages in date order" and "which contacts are there,
//! and under which name".
//!
//! # Example
//!
//! ```rust
//! use smsxtract::message::{Direction, Message};
//! use smsxtract::store::MessageStore;
//!
//! let mut store = MessageStore::new();
//! store.push(Message::text("5551234567", Direction::Incoming, 20, "", "Bob", "second"));
//! store.push(Message::text("5551234567", Direction::Outgoing, 10, "", "Bobby", "first"));
//!
//! let bodies: Vec<_> = store.ordered().iter().map(|m| m.body.as_str()).collect();
//! assert_eq!(bodies, ["first", "second"]);
//!
//! // Contact names are taken from the earliest message.
//! assert_eq!(store.contacts()[0].name, "Bobby");
//! ```

use std::collections::HashSet;

use crate::Message;

/// A distinct address with its resolved display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub address: String,
    pub name: String,
}

/// All messages exchanged with one contact, in timestamp order.
#[derive(Debug, Clone)]
pub struct ContactGroup<'a> {
    pub contact: Contact,
    pub messages: Vec<&'a Message>,
}

impl ContactGroup<'_> {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Append-only message collection.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    attachments: usize,
}

impl MessageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    pub fn push(&mut self, message: Message) {
        if message.is_attachment() {
            self.attachments += 1;
        }
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of attachment-bearing messages.
    pub fn attachment_count(&self) -> usize {
        self.attachments
    }

    /// Number of text messages.
    pub fn text_count(&self) -> usize {
        self.messages.len() - self.attachments
    }

    pub fn has_attachments(&self) -> bool {
        self.attachments > 0
    }

    /// All messages ascending by timestamp. Equal timestamps keep
    /// insertion order.
    pub fn ordered(&self) -> Vec<&Message> {
        let mut ordered: Vec<&Message> = self.messages.iter().collect();
        ordered.sort_by_key(|m| m.timestamp);
        ordered
    }

    /// Distinct addresses in order of their earliest message, each with the
    /// contact name of that earliest message.
    pub fn contacts(&self) -> Vec<Contact> {
        let mut seen = HashSet::new();
        self.ordered()
            .into_iter()
            .filter(|m| seen.insert(m.address.clone()))
            .map(|m| Contact {
                address: m.address.clone(),
                name: m.contact_name.clone(),
            })
            .collect()
    }

    /// Messages for one address, in timestamp order.
    pub fn messages_for(&self, address: &str) -> Vec<&Message> {
        self.ordered()
            .into_iter()
            .filter(|m| m.address == address)
            .collect()
    }

    /// One group per contact, in contact order.
    pub fn groups(&self) -> Vec<ContactGroup<'_>> {
        let ordered = self.ordered();
        self.contacts()
            .into_iter()
            .map(|contact| {
                let messages = ordered
                    .iter()
                    .copied()
                    .filter(|m| m.address == contact.address)
                    .collect();
                ContactGroup { contact, messages }
            })
            .collect()
    }

    /// Earliest and latest message, if the store is not empty.
    pub fn time_span(&self) -> Option<(&Message, &Message)> {
        let first = self.messages.iter().min_by_key(|m| m.timestamp)?;
        let last = self.messages.iter().max_by_key(|m| m.timestamp)?;
        Some((first, last))
    }
}

impl Extend<Message> for MessageStore {
    fn extend<T: IntoIterator<Item = Message>>(&mut self, iter: T) {
        for message in iter {
            self.push(message);
        }
    }
}

impl FromIterator<Message> for MessageStore {
    fn from_iter<T: IntoIterator<Item = Message>>(iter: T) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}
