//! Capability table shared between binding modules
//!
//! `file_info` publishes a versioned table of helper functions as the capsule
//! `file_info._C_API`. `manager` resolves it once at its own load time and
//! gets back a typed [`FileInfoApi`], so it can build and inspect file handles
//! without depending on the handle type itself.
//!
//! Slot indices are part of the contract. New slots are only ever appended and
//! the layout version is bumped on any incompatible change.

use crate::convert::FileIdArray;
use tocc_engine::{FileInfo, FileInfoCollection};
use tocc_host::{Capsule, Host, HostError, HostResult, Value};

/// Fully qualified capsule name
pub const FILE_INFO_CAPSULE_NAME: &str = "file_info._C_API";

/// Module attribute the capsule is stored under
pub const FILE_INFO_API_ATTRIBUTE: &str = "_C_API";

/// Layout version of the table
pub const FILE_INFO_API_VERSION: u32 = 1;

pub const IS_INSTANCE_NUM: usize = 0;
pub const CREATE_NUM: usize = 1;
pub const CREATE_LIST_NUM: usize = 2;
pub const BUILD_ID_ARRAY_NUM: usize = 3;
pub const UNWRAP_NUM: usize = 4;

/// Number of slots in layout version 1
pub const FILE_INFO_API_POINTERS: usize = 5;

pub type IsInstanceFn = fn(&Value) -> bool;
pub type CreateFn = fn(&FileInfo) -> Value;
pub type CreateListFn = fn(&FileInfoCollection) -> Value;
pub type BuildIdArrayFn = fn(&Value) -> HostResult<FileIdArray>;
pub type UnwrapFn = fn(&Value) -> Option<FileInfo>;

/// One typed entry of the table
#[derive(Clone, Copy)]
pub enum ApiSlot {
    IsInstance(IsInstanceFn),
    Create(CreateFn),
    CreateList(CreateListFn),
    BuildIdArray(BuildIdArrayFn),
    Unwrap(UnwrapFn),
}

impl ApiSlot {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiSlot::IsInstance(_) => "is_instance",
            ApiSlot::Create(_) => "create",
            ApiSlot::CreateList(_) => "create_list",
            ApiSlot::BuildIdArray(_) => "build_id_array",
            ApiSlot::Unwrap(_) => "unwrap",
        }
    }
}

impl std::fmt::Debug for ApiSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiSlot::{}", self.kind())
    }
}

/// The published table: a name, a layout version and the slots in index order
#[derive(Debug, Clone)]
pub struct CapabilityTable {
    name: &'static str,
    version: u32,
    slots: Vec<ApiSlot>,
}

impl CapabilityTable {
    pub fn new(name: &'static str, version: u32, slots: Vec<ApiSlot>) -> Self {
        Self {
            name,
            version,
            slots,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn slots(&self) -> &[ApiSlot] {
        &self.slots
    }

    pub fn into_capsule(self) -> Capsule {
        Capsule::new(self.name, self)
    }

    fn slot(&self, index: usize) -> HostResult<ApiSlot> {
        self.slots.get(index).copied().ok_or_else(|| {
            HostError::import_error(format!(
                "{} has {} slots, expected {}",
                self.name,
                self.slots.len(),
                FILE_INFO_API_POINTERS
            ))
        })
    }
}

/// Resolve slot `$index` of `$table`, which must be an `ApiSlot::$variant`
macro_rules! take_slot {
    ($table:expr, $index:expr, $variant:ident, $expected:literal) => {
        match $table.slot($index)? {
            ApiSlot::$variant(f) => f,
            other => {
                return Err(HostError::import_error(format!(
                    "{} slot {} holds '{}', expected '{}'",
                    $table.name(),
                    $index,
                    other.kind(),
                    $expected
                )))
            }
        }
    };
}

/// Typed view of the `file_info` capability table
#[derive(Clone, Copy)]
pub struct FileInfoApi {
    is_instance: IsInstanceFn,
    create: CreateFn,
    create_list: CreateListFn,
    build_id_array: BuildIdArrayFn,
    unwrap: UnwrapFn,
}

impl FileInfoApi {
    /// Resolve the table published by the loaded `file_info` module
    pub fn import(host: &Host) -> HostResult<Self> {
        let capsule = host.import_capsule(FILE_INFO_CAPSULE_NAME)?;
        let table = capsule.pointer::<CapabilityTable>(FILE_INFO_CAPSULE_NAME)?;
        let api = Self::from_table(&table)?;
        tracing::debug!(
            target: "tocc.manager",
            capsule = FILE_INFO_CAPSULE_NAME,
            version = table.version(),
            "capability table imported"
        );
        Ok(api)
    }

    /// Check the layout of `table` and bind its slots
    pub fn from_table(table: &CapabilityTable) -> HostResult<Self> {
        if table.name() != FILE_INFO_CAPSULE_NAME {
            return Err(HostError::import_error(format!(
                "capsule name mismatch: expected '{}', found '{}'",
                FILE_INFO_CAPSULE_NAME,
                table.name()
            )));
        }
        if table.version() != FILE_INFO_API_VERSION {
            return Err(HostError::import_error(format!(
                "{} version mismatch: expected {}, found {}",
                table.name(),
                FILE_INFO_API_VERSION,
                table.version()
            )));
        }

        Ok(Self {
            is_instance: take_slot!(table, IS_INSTANCE_NUM, IsInstance, "is_instance"),
            create: take_slot!(table, CREATE_NUM, Create, "create"),
            create_list: take_slot!(table, CREATE_LIST_NUM, CreateList, "create_list"),
            build_id_array: take_slot!(table, BUILD_ID_ARRAY_NUM, BuildIdArray, "build_id_array"),
            unwrap: take_slot!(table, UNWRAP_NUM, Unwrap, "unwrap"),
        })
    }

    /// True if `value` is a `file_info.FileInfo` handle
    pub fn is_instance(&self, value: &Value) -> bool {
        (self.is_instance)(value)
    }

    /// New handle owning a copy of `file_info`
    pub fn create(&self, file_info: &FileInfo) -> Value {
        (self.create)(file_info)
    }

    /// Host list of new handles, one per file
    pub fn create_list(&self, files: &FileInfoCollection) -> Value {
        (self.create_list)(files)
    }

    pub fn build_id_array(&self, sequence: &Value) -> HostResult<FileIdArray> {
        (self.build_id_array)(sequence)
    }

    /// Copy of the value a live handle wraps
    pub fn unwrap(&self, value: &Value) -> Option<FileInfo> {
        (self.unwrap)(value)
    }
}

impl std::fmt::Debug for FileInfoApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileInfoApi").finish_non_exhaustive()
    }
}
