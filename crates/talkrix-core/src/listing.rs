use crate::models::Agent;
use crate::models::CallRecord;
use crate::models::Campaign;
use crate::models::Contact;
use crate::models::Corpus;
use crate::models::CorpusDocument;
use crate::models::Tool;

/// Text a list row can be searched by.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, query_lower: &str) -> bool {
        if query_lower.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(query_lower))
    }
}

/// Case-insensitive substring filter, order preserving.
pub fn filter_items<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let query = query.trim().to_lowercase();
    items.iter().filter(|item| item.matches(&query)).collect()
}

impl Searchable for Agent {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.system_prompt.as_str()];
        fields.extend(self.voice.as_deref());
        fields.extend(self.model.as_deref());
        fields
    }
}

impl Searchable for Tool {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.description.as_str()]
    }
}

impl Searchable for Campaign {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.status.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Searchable for Contact {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.phone_number.as_str()];
        fields.extend(self.email.as_deref());
        fields
    }
}

impl Searchable for CallRecord {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.id.as_str(),
            self.agent_name.as_str(),
            self.from_number.as_str(),
            self.to_number.as_str(),
            self.status.label(),
        ];
        fields.extend(self.summary.as_deref());
        fields
    }
}

impl Searchable for Corpus {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Searchable for CorpusDocument {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.file_name.as_str()]
    }
}
