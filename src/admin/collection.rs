use super::client::CategoryRecord;

/// Outcome of [`CategoryList::upsert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    /// Holds the entry that was replaced.
    Replaced(CategoryRecord),
}

/// Categories keyed by identifier, kept in server order. Entries added
/// through `upsert` never duplicate an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryList {
    entries: Vec<CategoryRecord>,
}

impl CategoryList {
    pub fn new(entries: Vec<CategoryRecord>) -> Self {
        Self { entries }
    }

    pub fn replace_all(&mut self, entries: Vec<CategoryRecord>) {
        self.entries = entries;
    }

    /// Replaces the entry with the same id in place, or appends.
    pub fn upsert(&mut self, record: CategoryRecord) -> Upsert {
        match self.entries.iter_mut().find(|entry| entry.id == record.id) {
            Some(entry) => Upsert::Replaced(std::mem::replace(entry, record)),
            None => {
                self.entries.push(record);
                Upsert::Inserted
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<CategoryRecord> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&CategoryRecord> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRecord> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[CategoryRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
