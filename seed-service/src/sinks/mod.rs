pub mod sql_script;

pub use sql_script::{ScriptHeader, SqlEncode, SqlScriptSink};
