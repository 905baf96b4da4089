//! In-memory document store for copy tests.
//!
//! Both sides record every call in one shared event log, so tests can check the order of
//! drops, index creations and inserts.  Failures are injected per collection.
#![allow(dead_code)]

use bson::Document;
use mongo_copy::{DocumentStream, DropOutcome, SourceDb, StoreError, StoreResult, TargetDb};
use mongodb::IndexModel;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ListCollections,
    ListIndexes(String),
    Find(String),
    CursorClosed(String),
    Count(String),
    Drop(String, DropOutcome),
    CreateIndex(String, Document),
    Insert(String, Document),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

#[derive(Default, Clone)]
pub struct MemCollection {
    pub indexes: Vec<IndexModel>,
    pub docs: Vec<Document>,
}

pub struct MemSource {
    name: String,
    colls: Vec<(String, MemCollection)>,
    events: EventLog,
    pub fail_list: bool,
    /// collection -> 1-based position of the document whose read fails.
    pub fail_read_at: HashMap<String, usize>,
    pub fail_count: HashSet<String>,
}

impl MemSource {
    pub fn new(name: &str, events: EventLog) -> Self {
        MemSource {
            name: name.to_string(),
            colls: vec![],
            events,
            fail_list: false,
            fail_read_at: HashMap::new(),
            fail_count: HashSet::new(),
        }
    }

    pub fn with_collection(
        mut self,
        name: &str,
        indexes: Vec<IndexModel>,
        docs: Vec<Document>,
    ) -> Self {
        self.colls
            .push((name.to_string(), MemCollection { indexes, docs }));
        self
    }

    fn get(&self, coll: &str) -> MemCollection {
        self.colls
            .iter()
            .find(|(name, _)| name == coll)
            .map(|(_, c)| c.clone())
            .unwrap_or_default()
    }

    fn log(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

/// Cursor over a source collection, logs when it's closed.
struct MemCursor {
    coll: String,
    docs: std::vec::IntoIter<Document>,
    position: usize,
    fail_at: Option<usize>,
    events: EventLog,
}

impl Iterator for MemCursor {
    type Item = StoreResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        self.position += 1;
        if self.fail_at == Some(self.position) {
            return Some(Err(StoreError::Custom("cursor killed".to_string())));
        }
        self.docs.next().map(Ok)
    }
}

impl Drop for MemCursor {
    fn drop(&mut self) {
        self.events
            .borrow_mut()
            .push(Event::CursorClosed(self.coll.clone()));
    }
}

impl SourceDb for MemSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection_names(&self) -> StoreResult<Vec<String>> {
        self.log(Event::ListCollections);
        if self.fail_list {
            return Err(StoreError::Custom("connection reset".to_string()));
        }
        Ok(self.colls.iter().map(|(name, _)| name.clone()).collect())
    }

    fn indexes(&self, coll: &str) -> StoreResult<Vec<IndexModel>> {
        self.log(Event::ListIndexes(coll.to_string()));
        Ok(self.get(coll).indexes)
    }

    fn documents(&self, coll: &str) -> StoreResult<DocumentStream<'_>> {
        self.log(Event::Find(coll.to_string()));
        Ok(Box::new(MemCursor {
            coll: coll.to_string(),
            docs: self.get(coll).docs.into_iter(),
            position: 0,
            fail_at: self.fail_read_at.get(coll).copied(),
            events: self.events.clone(),
        }))
    }

    fn count_documents(&self, coll: &str) -> StoreResult<u64> {
        self.log(Event::Count(coll.to_string()));
        if self.fail_count.contains(coll) {
            return Err(StoreError::Custom("count failed".to_string()));
        }
        Ok(self.get(coll).docs.len() as u64)
    }
}

pub struct MemTarget {
    name: String,
    pub colls: RefCell<HashMap<String, MemCollection>>,
    events: EventLog,
    pub fail_drop: HashSet<String>,
    /// collection -> 1-based position of the index whose creation fails.
    pub fail_index_at: HashMap<String, usize>,
    /// collection -> 1-based position of the insert which fails.
    pub fail_insert_at: HashMap<String, usize>,
    inserts: RefCell<HashMap<String, usize>>,
    index_calls: RefCell<HashMap<String, usize>>,
}

impl MemTarget {
    pub fn new(name: &str, events: EventLog) -> Self {
        MemTarget {
            name: name.to_string(),
            colls: RefCell::new(HashMap::new()),
            events,
            fail_drop: HashSet::new(),
            fail_index_at: HashMap::new(),
            fail_insert_at: HashMap::new(),
            inserts: RefCell::new(HashMap::new()),
            index_calls: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_collection(self, name: &str, docs: Vec<Document>) -> Self {
        self.colls.borrow_mut().insert(
            name.to_string(),
            MemCollection {
                indexes: vec![],
                docs,
            },
        );
        self
    }

    pub fn docs(&self, coll: &str) -> Vec<Document> {
        self.colls
            .borrow()
            .get(coll)
            .map(|c| c.docs.clone())
            .unwrap_or_default()
    }

    pub fn index_keys(&self, coll: &str) -> Vec<Document> {
        self.colls
            .borrow()
            .get(coll)
            .map(|c| c.indexes.iter().map(|i| i.keys.clone()).collect())
            .unwrap_or_default()
    }

    pub fn insert_attempts(&self, coll: &str) -> usize {
        self.inserts.borrow().get(coll).copied().unwrap_or(0)
    }

    pub fn index_attempts(&self, coll: &str) -> usize {
        self.index_calls.borrow().get(coll).copied().unwrap_or(0)
    }

    fn log(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    fn bump(counter: &RefCell<HashMap<String, usize>>, coll: &str) -> usize {
        let mut counter = counter.borrow_mut();
        let n = counter.entry(coll.to_string()).or_insert(0);
        *n += 1;
        *n
    }
}

impl TargetDb for MemTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn drop_collection(&self, coll: &str) -> StoreResult<DropOutcome> {
        if self.fail_drop.contains(coll) {
            return Err(StoreError::Custom("not authorized".to_string()));
        }
        let outcome = match self.colls.borrow_mut().remove(coll) {
            Some(_) => DropOutcome::Dropped,
            None => DropOutcome::NotFound,
        };
        self.log(Event::Drop(coll.to_string(), outcome));
        Ok(outcome)
    }

    fn create_index(&self, coll: &str, index: IndexModel) -> StoreResult<()> {
        let n = Self::bump(&self.index_calls, coll);
        if self.fail_index_at.get(coll) == Some(&n) {
            return Err(StoreError::Custom("index options conflict".to_string()));
        }
        self.log(Event::CreateIndex(coll.to_string(), index.keys.clone()));
        self.colls
            .borrow_mut()
            .entry(coll.to_string())
            .or_default()
            .indexes
            .push(index);
        Ok(())
    }

    fn insert_document(&self, coll: &str, doc: Document) -> StoreResult<()> {
        let n = Self::bump(&self.inserts, coll);
        if self.fail_insert_at.get(coll) == Some(&n) {
            return Err(StoreError::Custom("duplicate key".to_string()));
        }
        self.log(Event::Insert(coll.to_string(), doc.clone()));
        self.colls
            .borrow_mut()
            .entry(coll.to_string())
            .or_default()
            .docs
            .push(doc);
        Ok(())
    }
}

pub fn new_events() -> EventLog {
    Rc::new(RefCell::new(vec![]))
}

pub fn index(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            mongodb::options::IndexOptions::builder()
                .name(name.to_string())
                .build(),
        )
        .build()
}
