//! Declaration event scripts
//!
//! The parser is not part of this crate. Instead, it (or a test) describes a
//! compilation unit as an ordered list of declaration events, serialized as
//! JSON:
//!
//! ```json
//! { "file": "main.sp",
//!   "events": [
//!     { "event": "function", "name": "main", "line": 1 },
//!     { "event": "begin_function", "name": "main", "line": 1 },
//!     { "event": "variable", "name": "x", "line": 2 },
//!     { "event": "use", "name": "x", "read": true, "line": 3 },
//!     { "event": "end_function" }
//!   ] }
//! ```

use serde::Deserialize;

use crate::semantic::symbol::StorageClass;
use crate::utils::{Error, Result, TokenPos};

/// A compilation unit as a list of events
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default = "default_file")]
    pub file: String,
    pub events: Vec<Event>,
}

fn default_file() -> String {
    "<input>".to_string()
}

impl Script {
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| Error::Script(e.to_string()))
    }
}

/// One event, with the position it occurs at
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub kind: EventKind,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub col: u32,
}

impl Event {
    pub fn pos(&self) -> TokenPos {
        TokenPos::new(0, self.line, self.col)
    }
}

/// What happened
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    /// Enter the file-static scope of an included file
    BeginFile,
    EndFile,

    /// Declare a function, prototype or native
    Function {
        name: String,
        #[serde(default)]
        storage: Option<StorageClass>,
        #[serde(default)]
        tag: Option<String>,
        #[serde(default)]
        native: bool,
        #[serde(default)]
        public: bool,
        #[serde(default)]
        stock: bool,
        #[serde(default)]
        forward: bool,
    },
    /// Start the parameter list and body of the most recent declaration of
    /// `name`
    BeginFunction { name: String },
    EndFunction,
    Param {
        name: String,
        #[serde(default)]
        tag: Option<String>,
        #[serde(default)]
        dims: Vec<i32>,
    },

    BeginBlock,
    EndBlock,

    Variable {
        name: String,
        #[serde(default)]
        storage: Option<StorageClass>,
        #[serde(default)]
        tag: Option<String>,
        #[serde(default)]
        dims: Vec<i32>,
        #[serde(default)]
        is_const: bool,
    },
    Constant {
        name: String,
        value: i32,
        #[serde(default)]
        storage: Option<StorageClass>,
        #[serde(default)]
        tag: Option<String>,
    },

    /// A use of `name`; neither flag set means a plain read
    Use {
        name: String,
        #[serde(default)]
        read: bool,
        #[serde(default)]
        written: bool,
    },
    /// Access to `type_name.name`
    Field { type_name: String, name: String },

    EnumStruct {
        name: String,
        #[serde(default)]
        fields: Vec<Member>,
        #[serde(default)]
        methods: Vec<Member>,
    },
    Operator {
        op: String,
        #[serde(default)]
        result_tag: Option<String>,
    },
}

/// Field or method of an enum struct
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = Script::from_json(
            r#"{ "file": "a.sp", "events": [
                { "event": "function", "name": "main", "public": true, "line": 1 },
                { "event": "begin_block" },
                { "event": "variable", "name": "x", "storage": "local", "dims": [2, 3], "line": 2, "col": 5 },
                { "event": "use", "name": "x", "written": true }
            ] }"#,
        )
        .unwrap();
        assert_eq!(script.file, "a.sp");
        assert_eq!(script.events.len(), 4);
        assert!(matches!(
            script.events[0].kind,
            EventKind::Function { public: true, forward: false, .. }
        ));
        assert!(matches!(script.events[1].kind, EventKind::BeginBlock));
        match &script.events[2].kind {
            EventKind::Variable { storage, dims, .. } => {
                assert_eq!(*storage, Some(StorageClass::Local));
                assert_eq!(dims, &vec![2, 3]);
            }
            other => panic!("Expected variable, got {:?}", other),
        }
        assert_eq!(script.events[2].pos(), TokenPos::new(0, 2, 5));
    }

    #[test]
    fn test_default_file_name() {
        let script = Script::from_json(r#"{ "events": [] }"#).unwrap();
        assert_eq!(script.file, "<input>");
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let err = Script::from_json(r#"{ "events": [ { "event": "teleport" } ] }"#).unwrap_err();
        assert!(matches!(err, Error::Script(_)));
    }
}
