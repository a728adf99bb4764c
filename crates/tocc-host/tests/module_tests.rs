//! Module registry, constructors and method dispatch through the public API

use pretty_assertions::assert_eq;
use std::any::Any;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tocc_host::{
    call_method, no_args, parse_args, CallArgs, Constructor, ErrorKind, Host, HostObject,
    HostResult, MethodDef, Module, ModuleDef, Param, RefGuard, TypeObject, Value,
};

struct Tally {
    total: AtomicI64,
}

fn tally_add(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    static PARAMS: [Param; 1] = [Param::required("amount")];
    let parsed = parse_args("add", args, &PARAMS)?;
    let amount = parsed
        .required("amount")?
        .as_int()
        .ok_or_else(|| tocc_host::HostError::type_error("amount must be int"))?;
    let tally = receiver.downcast_ref::<Tally>().ok_or_else(|| {
        tocc_host::HostError::type_error("not a Tally")
    })?;
    Ok(Value::Int(tally.total.fetch_add(amount, Ordering::SeqCst) + amount))
}

fn tally_total(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    no_args("total", args)?;
    let tally = receiver.downcast_ref::<Tally>().ok_or_else(|| {
        tocc_host::HostError::type_error("not a Tally")
    })?;
    Ok(Value::Int(tally.total.load(Ordering::SeqCst)))
}

static TALLY_METHODS: [MethodDef; 2] = [
    MethodDef {
        name: "add",
        doc: "Adds to the total.",
        call: tally_add,
    },
    MethodDef {
        name: "total",
        doc: "Returns the total.",
        call: tally_total,
    },
];

static TALLY_TYPE: TypeObject = TypeObject {
    name: "tally.Tally",
    doc: "Running total.",
    methods: &TALLY_METHODS,
};

impl HostObject for Tally {
    fn type_object(&self) -> &'static TypeObject {
        &TALLY_TYPE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct TallyModule;

impl ModuleDef for TallyModule {
    fn name(&self) -> &'static str {
        "tally"
    }

    fn init(&self, _host: &Host) -> HostResult<Module> {
        let constructor: Constructor = Arc::new(|args: &CallArgs| {
            no_args("Tally", args)?;
            Ok(Value::object(Tally {
                total: AtomicI64::new(0),
            }))
        });
        Ok(Module::new("tally", "Running totals.").with_type(&TALLY_TYPE, Some(constructor)))
    }
}

#[test]
fn test_construct_and_call() {
    let mut host = Host::new();
    host.load_module(&TallyModule).unwrap();

    let tally = host.construct("tally", "Tally", &CallArgs::new()).unwrap();
    call_method(&tally, "add", &CallArgs::new().arg(2i64)).unwrap();
    call_method(&tally, "add", &CallArgs::new().kwarg("amount", 3i64)).unwrap();

    assert_eq!(
        call_method(&tally, "total", &CallArgs::new()).unwrap(),
        Value::Int(5)
    );
}

#[test]
fn test_construct_unknown_type_or_module() {
    let mut host = Host::new();
    host.load_module(&TallyModule).unwrap();

    let err = host.construct("tally", "Counter", &CallArgs::new()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AttributeError);

    let err = host.construct("missing", "Tally", &CallArgs::new()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ImportError);
}

#[test]
fn test_module_metadata() {
    let mut host = Host::new();
    let module = host.load_module(&TallyModule).unwrap();
    assert_eq!(module.name(), "tally");
    assert_eq!(module.doc(), "Running totals.");
    assert_eq!(module.get_type("Tally").unwrap().object.name, "tally.Tally");
}

#[test]
fn test_guard_keeps_object_alive() {
    let mut host = Host::new();
    host.load_module(&TallyModule).unwrap();
    let tally = host.construct("tally", "Tally", &CallArgs::new()).unwrap();

    let guard = RefGuard::borrow(&tally);
    assert_eq!(tally.ref_count(), Some(2));
    drop(tally);

    let held = guard.get().unwrap();
    assert_eq!(held.ref_count(), Some(1));
    assert_eq!(
        call_method(held, "total", &CallArgs::new()).unwrap(),
        Value::Int(0)
    );
}
