//! Simulated host loader used by the integration suite.
//!
//! Mirrors the call order of a real content loader: the active mod is set,
//! the definition node goes through the (wrapped) deserializer, the entity is
//! registered, then the host resolves the entity's own name followed by every
//! name the definition references.

#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use customjson::{
    CaptureOptions, ContentDeserializer, ContentLookup, FieldStore, IdentityIntercept,
    LoadContext, LoadSession, ParseIntercept,
};
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Debug, Deserialize, PartialEq)]
/// The host's typed view of a definition; unknown fields are dropped.
pub struct Definition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub health: Option<i64>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

#[derive(Clone, Default)]
pub struct ActiveMod(Rc<RefCell<Option<String>>>);

impl LoadContext for ActiveMod {
    fn current_scope(&self) -> Result<String> {
        match self.0.borrow().as_ref() {
            Some(name) => Ok(name.clone()),
            None => bail!("no mod is currently loading"),
        }
    }
}

pub struct DefinitionParser;

impl ContentDeserializer for DefinitionParser {
    type Output = Definition;

    fn deserialize(&self, node: &Value) -> Result<Definition> {
        serde_json::from_value(node.clone()).context("deserializing content definition")
    }
}

#[derive(Clone, Default)]
pub struct Registry {
    entries: Rc<RefCell<BTreeMap<String, Definition>>>,
    lookups: Rc<RefCell<Vec<String>>>,
}

impl Registry {
    pub fn insert(&self, name: &str, definition: Definition) {
        self.entries.borrow_mut().insert(name.to_string(), definition);
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }
}

impl ContentLookup for Registry {
    type Entity = Definition;

    fn lookup(&self, name: &str) -> Option<Definition> {
        self.lookups.borrow_mut().push(name.to_string());
        self.entries.borrow().get(name).cloned()
    }
}

pub struct SimHost {
    pub session: LoadSession,
    pub registry: Registry,
    active: ActiveMod,
    parser: ParseIntercept<ActiveMod, DefinitionParser>,
    names: IdentityIntercept<Registry>,
}

impl SimHost {
    pub fn new(store: Arc<FieldStore>) -> Self {
        Self::with_options(store, CaptureOptions::default())
    }

    pub fn with_options(store: Arc<FieldStore>, options: CaptureOptions) -> Self {
        let session = LoadSession::new(store, options).expect("valid capture options");
        let active = ActiveMod::default();
        let registry = Registry::default();
        let parser = session.parse_intercept(active.clone(), DefinitionParser);
        let names = session.identity_intercept(registry.clone());
        Self {
            session,
            registry,
            active,
            parser,
            names,
        }
    }

    pub fn store(&self) -> &Arc<FieldStore> {
        self.session.store()
    }

    pub fn begin_mod(&self, scope: &str) {
        *self.active.0.borrow_mut() = Some(scope.to_string());
    }

    pub fn end_mod(&self) {
        *self.active.0.borrow_mut() = None;
    }

    /// Full load of one definition: parse, register, resolve own name, then
    /// resolve references.
    pub fn load_definition(&self, name: &str, node: &Value) -> Result<Definition> {
        let definition = self.parser.deserialize(node)?;
        self.registry.insert(name, definition.clone());
        self.names.lookup(name);
        for requirement in &definition.requirements {
            self.names.lookup(requirement);
        }
        Ok(definition)
    }

    /// Parse a node without any follow-up lookup.
    pub fn parse_only(&self, node: &Value) -> Result<Definition> {
        self.parser.deserialize(node)
    }

    pub fn resolve(&self, name: &str) -> Option<Definition> {
        self.names.lookup(name)
    }

    /// Load every `*.json` file in `dir` under `scope`, using the file stem as
    /// the content name. Files load in name order.
    pub fn load_dir(&self, scope: &str, dir: &Path) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();

        self.begin_mod(scope);
        let mut loaded = Vec::new();
        for path in files {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let node: Value = serde_json::from_str(&data)
                .with_context(|| format!("parsing {}", path.display()))?;
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            self.load_definition(name, &node)
                .with_context(|| format!("loading {}", path.display()))?;
            loaded.push(name.to_string());
        }
        self.end_mod();
        Ok(loaded)
    }
}

pub fn write_definition(dir: &Path, name: &str, node: &Value) -> Result<()> {
    let path = dir.join(format!("{name}.json"));
    fs::write(&path, serde_json::to_vec_pretty(node)?)
        .with_context(|| format!("writing {}", path.display()))
}

#[derive(Clone, Default)]
struct LogSink(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a debug-level subscriber scoped to this thread and return its
/// result together with the formatted log lines.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let sink = LogSink::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let bytes = sink.0.lock().unwrap_or_else(PoisonError::into_inner).clone();
    (result, String::from_utf8_lossy(&bytes).into_owned())
}
