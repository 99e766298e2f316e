//! Variables and procedures as recorded by the parser.

use bitflags::bitflags;

use crate::{FileId, NodeList, SourcePos, StrId, StringPool, Value};

/// Storage class of a variable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum VarScope {
    Local = 1,
    Global = 2,
    Import = 3,
    Export = 4,
}

impl VarScope {
    /// Boundary tag (`V_LOCAL`, `V_GLOBAL`, `V_IMPORT`, `V_EXPORT`).
    #[inline]
    pub const fn tag(self) -> i32 {
        self as i32
    }

    /// Whether the variable lives in the global namespace.
    #[inline]
    pub const fn is_global(self) -> bool {
        !matches!(self, VarScope::Local)
    }
}

/// One mention of a symbol: the line and the file it appears in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reference {
    pub line: u32,
    pub file: FileId,
}

impl Reference {
    #[inline]
    pub const fn at(pos: SourcePos) -> Self {
        Reference {
            line: pos.line,
            file: pos.file,
        }
    }
}

/// A declared variable, global or procedure-local.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    /// Name handle: string space for globals, the owning procedure's
    /// namelist for locals and parameters.
    pub name: StrId,
    pub scope: VarScope,
    /// Initial value; `Int(0)` when uninitialized.
    pub value: Value,
    /// Element count; `0` for a scalar.
    pub array_len: u32,
    pub declared: SourcePos,
    /// Mentions other than the declaration.
    pub uses: u32,
    pub initialized: bool,
    /// Every mention in textual order, declaration included.
    pub references: Vec<Reference>,
}

impl Variable {
    pub fn new(name: StrId, scope: VarScope, declared: SourcePos) -> Self {
        Variable {
            name,
            scope,
            value: Value::ZERO,
            array_len: 0,
            declared,
            uses: 0,
            initialized: false,
            references: Vec::new(),
        }
    }

    #[inline]
    pub fn num_refs(&self) -> usize {
        self.references.len()
    }

    /// Number of 4-byte slots the variable occupies in a namespace layout.
    #[inline]
    pub fn slot_count(&self) -> u32 {
        self.array_len.max(1)
    }
}

bitflags! {
    /// Procedure modifier and trigger bits as exposed at the host boundary.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ProcFlags: u32 {
        const TIMED = 0x01;
        const CONDITIONAL = 0x02;
        const IMPORT = 0x04;
        const EXPORT = 0x08;
        const CRITICAL = 0x10;
        const PURE = 0x20;
        const INLINE = 0x40;
    }
}

/// When a procedure fires on its own.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trigger {
    #[default]
    None,
    /// `procedure p in 10 ...`
    Timed { time: i32 },
    /// `procedure p when <expr> ...`; the condition is postfix and resolved
    /// in global context.
    Conditional { condition: NodeList },
}

impl Trigger {
    pub const fn flags(&self) -> ProcFlags {
        match self {
            Trigger::None => ProcFlags::empty(),
            Trigger::Timed { .. } => ProcFlags::TIMED,
            Trigger::Conditional { .. } => ProcFlags::CONDITIONAL,
        }
    }
}

/// Source extent of a procedure body, from its opening to its closing token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodySpan {
    pub start: SourcePos,
    pub end: SourcePos,
}

/// A declared procedure.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Procedure {
    /// Name handle in the string space.
    pub name: StrId,
    pub trigger: Trigger,
    /// Qualifier bits only; see [`Procedure::flags`] for the full set.
    pub modifiers: ProcFlags,
    /// Private pool for parameter and local names.
    pub namelist: StringPool,
    pub num_args: u32,
    /// Parameters without a default value.
    pub min_args: u32,
    pub defined: bool,
    /// Parameters first, then locals, in declaration order.
    pub locals: Vec<Variable>,
    /// Every mention in textual order, declaration included.
    pub references: Vec<Reference>,
    /// Mentions other than declarations and the definition.
    pub uses: u32,
    pub declared: SourcePos,
    pub body_span: Option<BodySpan>,
    pub body: NodeList,
}

impl Procedure {
    pub fn new(name: StrId, namelist: StringPool, declared: SourcePos) -> Self {
        Procedure {
            name,
            trigger: Trigger::None,
            modifiers: ProcFlags::empty(),
            namelist,
            num_args: 0,
            min_args: 0,
            defined: false,
            locals: Vec::new(),
            references: Vec::new(),
            uses: 0,
            declared,
            body_span: None,
            body: NodeList::new(),
        }
    }

    /// Modifier bits plus the trigger bit.
    pub fn flags(&self) -> ProcFlags {
        self.modifiers | self.trigger.flags()
    }

    /// Trigger time, `0` for procedures without a timed trigger.
    pub fn time(&self) -> i32 {
        match self.trigger {
            Trigger::Timed { time } => time,
            _ => 0,
        }
    }

    pub fn condition(&self) -> Option<&NodeList> {
        match &self.trigger {
            Trigger::Conditional { condition } => Some(condition),
            _ => None,
        }
    }

    #[inline]
    pub fn num_refs(&self) -> usize {
        self.references.len()
    }

    #[inline]
    pub fn is_import(&self) -> bool {
        self.modifiers.contains(ProcFlags::IMPORT)
    }

    #[inline]
    pub fn is_export(&self) -> bool {
        self.modifiers.contains(ProcFlags::EXPORT)
    }

    /// Find a parameter or local by name.
    pub fn find_local(&self, name: &str) -> Option<usize> {
        let id = self.namelist.find(name)?;
        self.locals.iter().position(|v| v.name == id)
    }
}
