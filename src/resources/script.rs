//! Scripted event handlers.
//!
//! Scripts register handlers by name through the `engine` table and the
//! gameplay layer triggers them:
//!
//! ```lua
//! engine.on("foo", function(subject)
//!     engine.log("foo at " .. subject.x .. "," .. subject.y)
//! end)
//! ```
//!
//! Without the `lua` feature scripts are accepted unread and triggers run no
//! handler.

use crate::error::ScriptError;

/// Snapshot of an entity handed to script handlers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptSubject {
    pub x: f32,
    pub y: f32,
    pub frame: usize,
}

#[cfg(feature = "lua")]
mod lua {
    use super::ScriptSubject;
    use crate::error::ScriptError;
    use log::{info, warn};
    use mlua::prelude::*;

    const PRELUDE: &str = r#"
engine.handlers = {}
function engine.on(name, fn)
    local list = engine.handlers[name]
    if list == nil then
        list = {}
        engine.handlers[name] = list
    end
    list[#list + 1] = fn
end
"#;

    /// Lua interpreter with the `engine` table installed.
    ///
    /// The Lua state is not thread-safe; the engine lives on the loop thread.
    pub struct ScriptEngine {
        lua: Lua,
    }

    impl ScriptEngine {
        pub fn new() -> Result<Self, ScriptError> {
            let lua = Lua::new();
            let engine = lua.create_table()?;
            engine.set(
                "log",
                lua.create_function(|_, msg: String| {
                    info!("[lua] {}", msg);
                    Ok(())
                })?,
            )?;
            engine.set(
                "warn",
                lua.create_function(|_, msg: String| {
                    warn!("[lua] {}", msg);
                    Ok(())
                })?,
            )?;
            lua.globals().set("engine", engine)?;
            lua.load(PRELUDE).set_name("prelude").exec()?;
            Ok(Self { lua })
        }

        /// Compile and run `source`. Handlers it registers stay installed.
        pub fn load_script(&mut self, name: &str, source: &str) -> Result<(), ScriptError> {
            self.lua.load(source).set_name(name).exec()?;
            Ok(())
        }

        /// Call every handler registered for `event` with `subject`, in
        /// registration order. Returns how many ran.
        pub fn trigger_event(
            &self,
            event: &str,
            subject: &ScriptSubject,
        ) -> Result<usize, ScriptError> {
            let engine: LuaTable = self.lua.globals().get("engine")?;
            let handlers: LuaTable = engine.get("handlers")?;
            let Some(list) = handlers.get::<Option<LuaTable>>(event)? else {
                return Ok(0);
            };
            let arg = self.lua.create_table()?;
            arg.set("x", subject.x)?;
            arg.set("y", subject.y)?;
            arg.set("frame", subject.frame)?;
            let mut count = 0;
            for handler in list.sequence_values::<LuaFunction>() {
                handler?.call::<()>(arg.clone())?;
                count += 1;
            }
            Ok(count)
        }
    }
}

#[cfg(feature = "lua")]
pub use lua::ScriptEngine;

#[cfg(not(feature = "lua"))]
pub struct ScriptEngine;

#[cfg(not(feature = "lua"))]
impl ScriptEngine {
    pub fn new() -> Result<Self, ScriptError> {
        Ok(ScriptEngine)
    }

    pub fn load_script(&mut self, name: &str, _source: &str) -> Result<(), ScriptError> {
        log::debug!("scripting disabled, ignoring '{}'", name);
        Ok(())
    }

    pub fn trigger_event(
        &self,
        _event: &str,
        _subject: &ScriptSubject,
    ) -> Result<usize, ScriptError> {
        Ok(0)
    }
}

#[cfg(all(test, feature = "lua"))]
mod tests {
    use super::*;

    fn subject() -> ScriptSubject {
        ScriptSubject {
            x: 1.5,
            y: -2.0,
            frame: 3,
        }
    }

    #[test]
    fn test_handlers_run_in_order() {
        let mut engine = ScriptEngine::new().unwrap();
        engine
            .load_script(
                "main.lua",
                r#"
                seen = {}
                engine.on("foo", function(s) seen[#seen + 1] = "a" .. s.frame end)
                engine.on("foo", function(s) seen[#seen + 1] = "b" .. s.x end)
                engine.on("bar", function(s) error("not called") end)
                "#,
            )
            .unwrap();
        assert_eq!(engine.trigger_event("foo", &subject()).unwrap(), 2);
        engine
            .load_script("check.lua", r#"assert(seen[1] == "a3" and seen[2] == "b1.5")"#)
            .unwrap();
    }

    #[test]
    fn test_unknown_event_runs_nothing() {
        let engine = ScriptEngine::new().unwrap();
        assert_eq!(engine.trigger_event("nope", &subject()).unwrap(), 0);
    }

    #[test]
    fn test_errors_are_reported() {
        let mut engine = ScriptEngine::new().unwrap();
        assert!(engine.load_script("bad.lua", "this is not lua").is_err());
        engine
            .load_script("boom.lua", r#"engine.on("foo", function() error("boom") end)"#)
            .unwrap();
        let err = engine.trigger_event("foo", &subject()).unwrap_err();
        assert!(err.0.contains("boom"));
    }
}
