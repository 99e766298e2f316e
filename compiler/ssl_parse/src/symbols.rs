//! Symbol Table Manager.
//!
//! Owns the global scope (variables and procedures share one name table) and,
//! through each [`Procedure`], that procedure's local scope. Declaration rules
//! are enforced here; every violation is pushed as a diagnostic and the
//! declaration continues with a best-effort result so later code can still be
//! checked.

use rustc_hash::FxHashMap;
use ssl_diagnostic::{redeclaration, Diagnostic, DiagnosticQueue, ErrorCode};
use ssl_ir::{
    Node, NodeKind, NodeList, PoolError, PoolId, ProcFlags, Procedure, SourcePos, StringPool, Trigger,
    Value, VarScope, Variable,
};

use crate::builtins;

/// A declared symbol, as a node or reference names it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Symbol {
    Global(u32),
    Local { proc: u32, index: u32 },
    Proc(u32),
    Builtin(u32),
}

impl Symbol {
    pub fn node_kind(self) -> NodeKind {
        match self {
            Symbol::Global(_) => NodeKind::GlobalVar,
            Symbol::Local { .. } => NodeKind::LocalVar,
            Symbol::Proc(_) => NodeKind::Proc,
            Symbol::Builtin(_) => NodeKind::Builtin,
        }
    }

    /// Index carried in the node payload.
    pub fn index(self) -> u32 {
        match self {
            Symbol::Global(idx) | Symbol::Proc(idx) | Symbol::Builtin(idx) => idx,
            Symbol::Local { index, .. } => index,
        }
    }

    pub fn to_node(self, pos: SourcePos) -> Node {
        Node::new(self.node_kind(), Value::Int(payload(self.index())), pos)
    }
}

/// Node payloads are `i32`; table indices never get near the limit.
pub(crate) fn payload(idx: u32) -> i32 {
    i32::try_from(idx).unwrap_or(i32::MAX)
}

pub(crate) fn index_of(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum GlobalName {
    Var(u32),
    Proc(u32),
}

/// A parameter as written in a procedure header.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub pos: SourcePos,
    pub default: Option<Value>,
}

/// Everything a procedure header says about its procedure.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcHeader {
    pub name: String,
    pub pos: SourcePos,
    pub modifiers: ProcFlags,
    pub trigger: Trigger,
    pub params: Vec<Param>,
    pub has_body: bool,
}

impl ProcHeader {
    fn num_args(&self) -> u32 {
        index_of(self.params.len())
    }

    fn min_args(&self) -> u32 {
        min_args(&self.params)
    }
}

fn min_args(params: &[Param]) -> u32 {
    index_of(params.iter().take_while(|p| p.default.is_none()).count())
}

/// Procedure ids at or above this name a discarded body's scope.
pub const DISCARDED_BASE: u32 = 1 << 31;

fn discarded_slot(idx: u32) -> Option<usize> {
    idx.checked_sub(DISCARDED_BASE).map(|slot| slot as usize)
}

/// What the parser should do after a procedure header.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ProcDecl {
    /// Parse the body into this procedure.
    Define(u32),
    /// A declaration without a body.
    Declared(u32),
    /// The header was rejected; skip any body. Carries the procedure the
    /// name refers to, if it names one.
    Rejected(Option<u32>),
}

/// Global and per-procedure symbol tables plus the string space.
#[derive(Debug)]
pub struct SymbolTable {
    pub stringspace: StringPool,
    pub vars: Vec<Variable>,
    pub procs: Vec<Procedure>,
    globals: FxHashMap<Box<str>, GlobalName>,
    /// Bodies of rejected headers. Parsed for diagnostics, never emitted.
    discarded: Vec<Procedure>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            stringspace: StringPool::new(PoolId::StringSpace),
            vars: Vec::new(),
            procs: Vec::new(),
            globals: FxHashMap::default(),
            discarded: Vec::new(),
        }
    }

    /// The procedure whose scope `idx` names, discarded ones included.
    pub fn procedure(&self, idx: u32) -> Option<&Procedure> {
        match discarded_slot(idx) {
            Some(slot) => self.discarded.get(slot),
            None => self.procs.get(idx as usize),
        }
    }

    pub fn procedure_mut(&mut self, idx: u32) -> Option<&mut Procedure> {
        match discarded_slot(idx) {
            Some(slot) => self.discarded.get_mut(slot),
            None => self.procs.get_mut(idx as usize),
        }
    }

    /// Scope ids and bodies of the discarded procedures.
    pub fn discarded_bodies(&self) -> impl Iterator<Item = (u32, &NodeList)> + '_ {
        self.discarded
            .iter()
            .enumerate()
            .map(|(slot, proc)| (DISCARDED_BASE.saturating_add(index_of(slot)), &proc.body))
    }

    /// Find a global variable or procedure.
    pub fn lookup_global(&self, name: &str) -> Option<Symbol> {
        self.globals.get(name).map(|g| match *g {
            GlobalName::Var(idx) => Symbol::Global(idx),
            GlobalName::Proc(idx) => Symbol::Proc(idx),
        })
    }

    /// Find a parameter or local of procedure `proc`.
    pub fn lookup_local(&self, proc: u32, name: &str) -> Option<Symbol> {
        let index = self.procedure(proc)?.find_local(name)?;
        Some(Symbol::Local {
            proc,
            index: index_of(index),
        })
    }

    /// Lexical lookup: locals of `context`, then globals, then built-ins.
    pub fn lookup(&self, name: &str, context: Option<u32>) -> Option<Symbol> {
        context
            .and_then(|proc| self.lookup_local(proc, name))
            .or_else(|| self.lookup_global(name))
            .or_else(|| builtins::find(name).map(|idx| Symbol::Builtin(index_of(idx))))
    }

    /// Display name of a symbol.
    pub fn name_of(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::Global(idx) => self
                .vars
                .get(idx as usize)
                .map_or("", |v| self.stringspace.lookup(v.name)),
            Symbol::Proc(idx) => self
                .procs
                .get(idx as usize)
                .map_or("", |p| self.stringspace.lookup(p.name)),
            Symbol::Local { proc, index } => self
                .procedure(proc)
                .and_then(|p| Some(p.namelist.lookup(p.locals.get(index as usize)?.name)))
                .unwrap_or(""),
            Symbol::Builtin(idx) => builtins::get(idx as usize).map_or("", |b| b.name),
        }
    }

    /// Where a global symbol was first declared.
    fn global_site(&self, name: GlobalName) -> SourcePos {
        match name {
            GlobalName::Var(idx) => self.vars[idx as usize].declared,
            GlobalName::Proc(idx) => self.procs[idx as usize].declared,
        }
    }

    /// Declare a global, import or export variable.
    pub fn declare_var(
        &mut self,
        name: &str,
        scope: VarScope,
        pos: SourcePos,
    ) -> Result<u32, Diagnostic> {
        if let Some(&existing) = self.globals.get(name) {
            return Err(redeclaration(pos, self.global_site(existing), name));
        }
        let id = self
            .stringspace
            .try_intern(name)
            .map_err(|e| pool_diagnostic(pos, &e))?;
        let idx = index_of(self.vars.len());
        self.vars.push(Variable::new(id, scope, pos));
        self.globals.insert(name.into(), GlobalName::Var(idx));
        Ok(idx)
    }

    /// Declare a parameter or local in procedure `proc`.
    ///
    /// Shadowing a global is allowed; repeating a local name is not.
    pub fn declare_local(&mut self, proc: u32, name: &str, pos: SourcePos) -> Result<u32, Diagnostic> {
        let procedure = match discarded_slot(proc) {
            Some(slot) => &mut self.discarded[slot],
            None => &mut self.procs[proc as usize],
        };
        if let Some(existing) = procedure.find_local(name) {
            return Err(redeclaration(pos, procedure.locals[existing].declared, name));
        }
        let id = procedure
            .namelist
            .try_intern(name)
            .map_err(|e| pool_diagnostic(pos, &e))?;
        let idx = index_of(procedure.locals.len());
        procedure.locals.push(Variable::new(id, VarScope::Local, pos));
        Ok(idx)
    }

    /// Declare or define a procedure.
    ///
    /// A header without a body is a forward declaration; a later header with
    /// a body completes it. Problems are pushed to `diags`.
    pub fn declare_proc(&mut self, mut header: ProcHeader, diags: &mut DiagnosticQueue) -> ProcDecl {
        check_modifiers(&mut header, diags);

        match self.globals.get(header.name.as_str()).copied() {
            Some(GlobalName::Var(idx)) => {
                let first = self.vars[idx as usize].declared;
                diags.push(redeclaration(header.pos, first, &header.name));
                ProcDecl::Rejected(None)
            }
            Some(GlobalName::Proc(idx)) => self.merge_proc(idx, header, diags),
            None => {
                let id = match self.stringspace.try_intern(&header.name) {
                    Ok(id) => id,
                    Err(e) => {
                        diags.push(pool_diagnostic(header.pos, &e));
                        return ProcDecl::Rejected(None);
                    }
                };
                let idx = index_of(self.procs.len());
                let namelist = StringPool::new(PoolId::Namelist(idx));
                let mut proc = Procedure::new(id, namelist, header.pos);
                proc.modifiers = header.modifiers;
                proc.trigger = std::mem::take(&mut header.trigger);
                self.procs.push(proc);
                self.globals.insert(header.name.as_str().into(), GlobalName::Proc(idx));
                self.set_params(idx, &header.params, diags);

                if header.has_body {
                    ProcDecl::Define(idx)
                } else {
                    ProcDecl::Declared(idx)
                }
            }
        }
    }

    fn merge_proc(&mut self, idx: u32, mut header: ProcHeader, diags: &mut DiagnosticQueue) -> ProcDecl {
        let proc = &mut self.procs[idx as usize];
        let first = proc.declared;

        if header.has_body && proc.defined {
            diags.push(
                Diagnostic::error(ErrorCode::E3001)
                    .with_message(format!(
                        "procedure `{}` defined again on line {}, first defined on line {}",
                        header.name,
                        header.pos.line,
                        proc.body_span.map_or(first.line, |s| s.start.line)
                    ))
                    .with_label(header.pos, "redefined here")
                    .with_secondary_label(first, "first declared here"),
            );
            return ProcDecl::Rejected(Some(idx));
        }

        if proc.num_args != header.num_args() || proc.min_args != header.min_args() {
            diags.push(
                Diagnostic::error(ErrorCode::E3002)
                    .with_message(format!(
                        "`{}` declared with {} parameters on line {} but {} on line {}",
                        header.name,
                        proc.num_args,
                        first.line,
                        header.num_args(),
                        header.pos.line
                    ))
                    .with_label(header.pos, "parameters differ here")
                    .with_secondary_label(first, "previous declaration"),
            );
        }

        let conflict = match (&proc.trigger, &header.trigger) {
            (_, Trigger::None) => None,
            (old, new) if std::mem::discriminant(old) != std::mem::discriminant(new) => {
                if matches!(old, Trigger::None) {
                    None
                } else {
                    Some("has both a timed and a conditional trigger".to_string())
                }
            }
            (Trigger::Timed { time: old }, Trigger::Timed { time: new }) if old != new => {
                Some(format!("is declared with trigger time {old} and {new}"))
            }
            _ => None,
        };
        match conflict {
            Some(what) => diags.push(
                Diagnostic::error(ErrorCode::E4003)
                    .with_message(format!("`{}` {what}", header.name))
                    .with_label(header.pos, "trigger conflicts")
                    .with_secondary_label(first, "previous declaration"),
            ),
            // A later condition or time replaces an earlier one.
            None if !matches!(header.trigger, Trigger::None) => {
                proc.trigger = std::mem::take(&mut header.trigger);
            }
            None => {}
        }

        let merged = proc.modifiers | header.modifiers;
        if merged.contains(ProcFlags::IMPORT | ProcFlags::EXPORT) {
            diags.push(
                Diagnostic::error(ErrorCode::E4004)
                    .with_message(format!("`{}` is declared both import and export", header.name))
                    .with_label(header.pos, "conflicting qualifier")
                    .with_secondary_label(first, "previous declaration"),
            );
            let both = ProcFlags::IMPORT | ProcFlags::EXPORT;
            proc.modifiers = (merged - both) | (proc.modifiers & both);
        } else {
            proc.modifiers = merged;
        }

        if !header.has_body {
            return ProcDecl::Declared(idx);
        }
        if proc.modifiers.contains(ProcFlags::IMPORT) {
            diags.push(import_with_body(&header.name, header.pos));
            proc.modifiers.remove(ProcFlags::IMPORT);
        }
        // The definition's parameter names are the ones its body uses.
        proc.locals.clear();
        proc.namelist = StringPool::new(PoolId::Namelist(idx));
        self.set_params(idx, &header.params, diags);
        ProcDecl::Define(idx)
    }

    /// Open a scratch scope for the body of a rejected header, so the body
    /// can still be checked. Returns the scope id to parse the body under.
    pub fn declare_discarded(
        &mut self,
        name: &str,
        pos: SourcePos,
        params: &[Param],
        diags: &mut DiagnosticQueue,
    ) -> Option<u32> {
        let idx = DISCARDED_BASE.saturating_add(index_of(self.discarded.len()));
        let mut namelist = StringPool::new(PoolId::Namelist(idx));
        let id = match namelist.try_intern(name) {
            Ok(id) => id,
            Err(e) => {
                diags.push(pool_diagnostic(pos, &e));
                return None;
            }
        };
        self.discarded.push(Procedure::new(id, namelist, pos));
        self.set_params(idx, params, diags);
        Some(idx)
    }

    fn set_params(&mut self, idx: u32, params: &[Param], diags: &mut DiagnosticQueue) {
        for param in params {
            match self.declare_local(idx, &param.name, param.pos) {
                Ok(local) => {
                    let var = self
                        .procedure_mut(idx)
                        .and_then(|p| p.locals.get_mut(local as usize));
                    if let (Some(var), Some(default)) = (var, param.default) {
                        var.value = default;
                        var.initialized = true;
                    }
                }
                Err(diag) => diags.push(diag),
            }
        }
        if let Some(proc) = self.procedure_mut(idx) {
            proc.num_args = index_of(params.len());
            proc.min_args = min_args(params);
        }
    }

    /// End-of-unit checks on procedures that never received a body.
    pub fn check_definitions(&mut self, diags: &mut DiagnosticQueue) {
        for proc in self.procs.iter_mut().filter(|p| !p.defined) {
            let name = self.stringspace.lookup(proc.name);
            if proc.is_export() {
                diags.push(
                    Diagnostic::error(ErrorCode::E4002)
                        .with_message(format!("exported procedure `{name}` has no body"))
                        .with_label(proc.declared, "declared here")
                        .with_note("an exported procedure must be defined in this script"),
                );
                proc.modifiers.remove(ProcFlags::EXPORT);
            } else if !proc.is_import() {
                diags.push(
                    Diagnostic::warning(ErrorCode::W0001)
                        .with_message(format!("procedure `{name}` is declared but never defined"))
                        .with_label(proc.declared, "declared here"),
                );
            }
        }
    }
}

/// Qualifier rules that need only the header itself.
fn check_modifiers(header: &mut ProcHeader, diags: &mut DiagnosticQueue) {
    let both = ProcFlags::IMPORT | ProcFlags::EXPORT;
    if header.modifiers.contains(both) {
        diags.push(
            Diagnostic::error(ErrorCode::E4004)
                .with_message(format!("`{}` is declared both import and export", header.name))
                .with_label(header.pos, "conflicting qualifiers"),
        );
        let drop = if header.has_body {
            ProcFlags::IMPORT
        } else {
            ProcFlags::EXPORT
        };
        header.modifiers.remove(drop);
    }
    if header.has_body && header.modifiers.contains(ProcFlags::IMPORT) {
        diags.push(import_with_body(&header.name, header.pos));
        header.modifiers.remove(ProcFlags::IMPORT);
    }
}

fn import_with_body(name: &str, pos: SourcePos) -> Diagnostic {
    Diagnostic::error(ErrorCode::E4001)
        .with_message(format!("imported procedure `{name}` cannot have a body"))
        .with_label(pos, "defined here")
        .with_note("import procedures are defined by another script")
}

pub(crate) fn pool_diagnostic(pos: SourcePos, err: &PoolError) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1004)
        .with_message(format!("cannot record name: {err}"))
        .with_label(pos, "here")
}

#[cfg(test)]
mod tests;
