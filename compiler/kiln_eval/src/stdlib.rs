//! Standard host catalog.
//!
//! The handful of runtime operations programs need to be observable and to
//! exercise `await`: console output, delays, cooperative yields and already
//! completed tasks. All of them are static and registered up front.

use std::thread;
use std::time::Duration;

use kiln_ir::{SharedInterner, Type};

use crate::host::{HostCatalog, HostError};
use crate::{Pending, SharedPrintHandler, Value};

pub const CONSOLE: &str = "System.Console";
pub const TASK: &str = "System.Threading.Tasks.Task";

/// Catalog with the standard operations, printing through `print`.
pub fn standard_catalog(interner: SharedInterner, print: &SharedPrintHandler) -> HostCatalog {
    let mut catalog = HostCatalog::new(interner);
    register_console(&mut catalog, print);
    register_tasks(&mut catalog);
    catalog
}

/// `Console.WriteLine(string)` and `Console.WriteLine(string, object)`.
pub fn register_console(catalog: &mut HostCatalog, print: &SharedPrintHandler) {
    let out = SharedPrintHandler::clone(print);
    catalog.register(CONSOLE, "WriteLine", vec![Type::Str], move |args| {
        let [line] = args else {
            return Err(HostError::new("WriteLine expects one argument"));
        };
        out.println(&line.to_string());
        Ok(Value::Void)
    });

    let out = SharedPrintHandler::clone(print);
    catalog.register(
        CONSOLE,
        "WriteLine",
        vec![Type::Str, Type::Object],
        move |args| {
            let [format, arg] = args else {
                return Err(HostError::new("WriteLine expects two arguments"));
            };
            let Some(format) = format.as_str() else {
                return Err(HostError::argument(0, "string", format));
            };
            out.println(&substitute(format, arg));
            Ok(Value::Void)
        },
    );
}

/// `Task.Delay(int)`, `Task.Yield()` and `Task.FromResult(object)`.
pub fn register_tasks(catalog: &mut HostCatalog) {
    catalog.register(TASK, "Delay", vec![Type::Int], |args| {
        let millis = match args {
            [Value::Int(ms)] => u64::try_from(*ms)
                .map_err(|_| HostError::new(format!("delay must be non-negative, got {ms}")))?,
            [other] => return Err(HostError::argument(0, "int", other)),
            _ => return Err(HostError::new("Delay expects one argument")),
        };
        let pending = Pending::new();
        let timer = pending.clone();
        thread::Builder::new()
            .name("kiln-delay".into())
            .spawn(move || {
                thread::sleep(Duration::from_millis(millis));
                timer.complete(Value::Void);
            })
            .map_err(|e| HostError::new(format!("cannot start delay timer: {e}")))?;
        Ok(Value::Signal(pending))
    });

    catalog.register(TASK, "Yield", vec![], |_| Ok(Value::Yield));

    catalog.register(TASK, "FromResult", vec![Type::Object], |args| match args {
        [value] => Ok(Value::ready(value.clone())),
        _ => Err(HostError::new("FromResult expects one argument")),
    });
}

/// Replace every `{0}` in `format` with `arg`.
fn substitute(format: &str, arg: &Value) -> String {
    format.replace("{0}", &arg.to_string())
}
