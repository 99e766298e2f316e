//! Reference Tracker.
//!
//! Every textual mention of a symbol is recorded with a sequence number taken
//! when the parser reaches it. Mentions of names that are only resolved at the
//! end of the unit reserve their number up front, so once everything is
//! distributed each symbol's list is in textual order regardless of when its
//! owner became known.

use ssl_ir::{Procedure, Reference, SourcePos, Variable};

use crate::symbols::Symbol;

/// Whether a mention declares the symbol or uses it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Mention {
    Declaration,
    Use,
}

#[derive(Copy, Clone, Debug)]
struct Entry {
    seq: u32,
    symbol: Symbol,
    site: Reference,
    mention: Mention,
}

#[derive(Clone, Debug, Default)]
pub struct ReferenceTracker {
    next_seq: u32,
    entries: Vec<Entry>,
}

impl ReferenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next sequence number for a mention recorded later.
    pub fn reserve(&mut self) -> u32 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Record a mention at the current point of the parse.
    pub fn record(&mut self, symbol: Symbol, pos: SourcePos, mention: Mention) {
        let seq = self.reserve();
        self.record_at(seq, symbol, pos, mention);
    }

    /// Record a mention under a previously reserved sequence number.
    ///
    /// Built-ins carry no references; mentions of them are dropped.
    pub fn record_at(&mut self, seq: u32, symbol: Symbol, pos: SourcePos, mention: Mention) {
        if matches!(symbol, Symbol::Builtin(_)) {
            return;
        }
        self.entries.push(Entry {
            seq,
            symbol,
            site: Reference::at(pos),
            mention,
        });
    }

    /// Mentions of `symbol` in textual order.
    pub fn references_of(&self, symbol: Symbol) -> Vec<Reference> {
        let mut found: Vec<&Entry> = self.entries.iter().filter(|e| e.symbol == symbol).collect();
        found.sort_by_key(|e| e.seq);
        found.into_iter().map(|e| e.site).collect()
    }

    /// Move every recorded mention onto its owner, counting uses.
    pub fn distribute(mut self, vars: &mut [Variable], procs: &mut [Procedure]) {
        self.entries.sort_by_key(|e| e.seq);
        for entry in self.entries {
            let is_use = entry.mention == Mention::Use;
            let (references, uses) = match entry.symbol {
                Symbol::Global(idx) => match vars.get_mut(idx as usize) {
                    Some(var) => (&mut var.references, &mut var.uses),
                    None => continue,
                },
                Symbol::Proc(idx) => match procs.get_mut(idx as usize) {
                    Some(proc) => (&mut proc.references, &mut proc.uses),
                    None => continue,
                },
                Symbol::Local { proc, index } => match procs
                    .get_mut(proc as usize)
                    .and_then(|p| p.locals.get_mut(index as usize))
                {
                    Some(var) => (&mut var.references, &mut var.uses),
                    None => continue,
                },
                Symbol::Builtin(_) => continue,
            };
            references.push(entry.site);
            if is_use {
                *uses += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssl_ir::{FileId, PoolId, StrId, StringPool, VarScope};

    fn at(line: u32) -> SourcePos {
        SourcePos::new(FileId::PRIMARY, line, 1)
    }

    fn name() -> StrId {
        StringPool::new(PoolId::StringSpace).try_intern("v").unwrap()
    }

    #[test]
    fn test_reserved_mentions_keep_textual_order() {
        let mut tracker = ReferenceTracker::new();
        let early = tracker.reserve();
        tracker.record(Symbol::Global(0), at(1), Mention::Declaration);
        tracker.record(Symbol::Global(0), at(7), Mention::Use);
        tracker.record_at(early, Symbol::Global(0), at(3), Mention::Use);

        let lines: Vec<u32> = tracker
            .references_of(Symbol::Global(0))
            .iter()
            .map(|r| r.line)
            .collect();
        assert_eq!(lines, [3, 1, 7]);
    }

    #[test]
    fn test_builtins_are_not_tracked() {
        let mut tracker = ReferenceTracker::new();
        tracker.record(Symbol::Builtin(3), at(2), Mention::Use);
        assert!(tracker.references_of(Symbol::Builtin(3)).is_empty());
    }

    #[test]
    fn test_distribute_counts_uses_only() {
        let mut vars = vec![Variable::new(name(), VarScope::Global, at(1))];
        let mut tracker = ReferenceTracker::new();
        tracker.record(Symbol::Global(0), at(1), Mention::Declaration);
        tracker.record(Symbol::Global(0), at(4), Mention::Use);
        tracker.record(Symbol::Global(0), at(4), Mention::Use);

        tracker.distribute(&mut vars, &mut []);

        assert_eq!(vars[0].num_refs(), 3);
        assert_eq!(vars[0].uses, 2);
        assert_eq!(vars[0].references[0].line, 1);
    }
}
