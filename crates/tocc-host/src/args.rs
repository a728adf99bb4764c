//! Call arguments and signature parsing
//!
//! Host calls carry positional and keyword arguments. A binding declares its
//! signature as a slice of [`Param`]s and [`parse_args`] matches the call
//! against it, rejecting wrong counts and unknown or duplicated keywords
//! before the binding looks at any value.

use crate::error::{HostError, HostResult};
use crate::value::Value;

/// Positional and keyword arguments of one host call
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.push((name.into(), value.into()));
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }

    /// Total number of arguments
    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One declared parameter of a host-callable signature
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub required: bool,
}

impl Param {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// Arguments matched to their declared parameters
#[derive(Debug)]
pub struct ParsedArgs<'a> {
    function: &'static str,
    params: &'static [Param],
    slots: Vec<Option<&'a Value>>,
}

impl<'a> ParsedArgs<'a> {
    /// Argument bound to `name`, if one was passed
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.params
            .iter()
            .position(|p| p.name == name)
            .and_then(|index| self.slots[index])
    }

    /// Argument bound to a required parameter
    pub fn required(&self, name: &str) -> HostResult<&'a Value> {
        self.get(name).ok_or_else(|| {
            HostError::type_error(format!(
                "{}() missing required argument '{}'",
                self.function, name
            ))
        })
    }

    pub fn function(&self) -> &'static str {
        self.function
    }
}

/// Match `args` to `params`
///
/// Positional arguments bind left to right; keywords bind by name. Required
/// parameters must be bound once the call is matched.
pub fn parse_args<'a>(
    function: &'static str,
    args: &'a CallArgs,
    params: &'static [Param],
) -> HostResult<ParsedArgs<'a>> {
    if args.positional.len() > params.len() {
        return Err(HostError::type_error(format!(
            "{}() takes at most {} argument{} ({} given)",
            function,
            params.len(),
            if params.len() == 1 { "" } else { "s" },
            args.positional.len()
        )));
    }

    let mut slots: Vec<Option<&'a Value>> = vec![None; params.len()];
    for (slot, value) in slots.iter_mut().zip(&args.positional) {
        *slot = Some(value);
    }

    for (name, value) in &args.keywords {
        let index = params
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| {
                HostError::type_error(format!(
                    "'{}' is an invalid keyword argument for {}()",
                    name, function
                ))
            })?;
        if slots[index].is_some() {
            return Err(HostError::type_error(format!(
                "argument for {}() given by name ('{}') and position ({})",
                function,
                name,
                index + 1
            )));
        }
        slots[index] = Some(value);
    }

    for (param, slot) in params.iter().zip(&slots) {
        if param.required && slot.is_none() {
            return Err(HostError::type_error(format!(
                "{}() missing required argument '{}'",
                function, param.name
            )));
        }
    }

    Ok(ParsedArgs {
        function,
        params,
        slots,
    })
}

/// Reject any argument for functions that take none
pub fn no_args(function: &'static str, args: &CallArgs) -> HostResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(HostError::type_error(format!(
            "{}() takes no arguments ({} given)",
            function,
            args.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    static IMPORT_PARAMS: [Param; 3] = [
        Param::required("source_path"),
        Param::optional("title"),
        Param::optional("tags"),
    ];

    #[test]
    fn test_positional_and_keyword_binding() {
        let args = CallArgs::new().arg("/tmp/a.txt").kwarg("tags", Value::list(vec![]));
        let parsed = parse_args("import_file", &args, &IMPORT_PARAMS).unwrap();
        assert_eq!(parsed.required("source_path").unwrap(), &Value::from("/tmp/a.txt"));
        assert!(parsed.get("title").is_none());
        assert!(parsed.get("tags").is_some());
    }

    #[rstest]
    #[case::missing(CallArgs::new().kwarg("title", "A"), "import_file() missing required argument 'source_path'")]
    #[case::too_many(
        CallArgs::new().arg("a").arg("b").arg("c").arg("d"),
        "import_file() takes at most 3 arguments (4 given)"
    )]
    #[case::unknown(
        CallArgs::new().arg("a").kwarg("colour", "red"),
        "'colour' is an invalid keyword argument for import_file()"
    )]
    #[case::duplicate(
        CallArgs::new().arg("a").kwarg("source_path", "b"),
        "argument for import_file() given by name ('source_path') and position (1)"
    )]
    fn test_signature_errors(#[case] args: CallArgs, #[case] expected: &str) {
        let err = parse_args("import_file", &args, &IMPORT_PARAMS).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(err.message, expected);
    }

    #[test]
    fn test_no_args() {
        assert!(no_args("initialize", &CallArgs::new()).is_ok());
        let err = no_args("initialize", &CallArgs::new().arg(1i64)).unwrap_err();
        assert_eq!(err.message, "initialize() takes no arguments (1 given)");
    }
}
