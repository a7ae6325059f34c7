//! Reconciliation of function tables with script tables.
//!
//! Vim reports script lines and function lines separately, so a script's
//! function bodies show no counts until each function has been located:
//!
//! 1. Functions with a `Defined:` site are mapped there directly.
//! 2. Functions without one are grouped by a digest of their body text.
//!    Bodies that are unique are searched for at every executed
//!    `:function` line of every block (functions first, then scripts).
//!    A function found inside another function's body is propagated
//!    outwards by re-mapping the outer function into its own owner.
//! 3. If every body is ambiguous, functions are paired with definition
//!    sites in report order without comparing text.
//! 4. When every function had a site, script counts flow back into
//!    untouched rows of the function tables.

use super::matcher::{map_lines, map_positionally};
use super::patterns::is_function_definition;
use crate::parser::schema::{Line, Profile};
use log::debug;
use sha2::{Digest, Sha512};
use std::collections::{HashMap, HashSet, VecDeque};

/// A table that function bodies can be mapped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockId {
    Script(usize),
    Function(usize),
}

/// What reconciliation did, for logging and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Functions mapped at their `Defined:` site
    pub declared: usize,
    /// Digest groups among functions without a site
    pub digest_groups: usize,
    /// Candidates for the content search (unique digests)
    pub initial_pool: usize,
    /// Largest candidate pool seen during the search
    pub peak_pool: usize,
    /// Functions found by the content search
    pub searched: usize,
    /// Outward propagations performed
    pub propagations: usize,
    /// Functions paired by report order
    pub positional: usize,
}

/// Map every function of `profile` onto its owning block
///
/// **Public** - main entry point for reconciliation
///
/// Never fails: a function that cannot be placed keeps `mapped == false`.
pub fn reconcile(profile: &mut Profile) -> ReconcileStats {
    let mut stats = ReconcileStats::default();
    let mut undeclared = Vec::new();

    for index in 0..profile.functions.len() {
        let function = &profile.functions[index];
        if function.is_lambda() {
            continue;
        }
        if function.defined.is_some() {
            if map_declared(profile, index) {
                stats.declared += 1;
            }
        } else {
            undeclared.push(index);
        }
    }

    if undeclared.is_empty() {
        backfill_functions(profile);
        return stats;
    }

    let groups = group_by_digest(profile, &undeclared);
    stats.digest_groups = groups.len();
    let candidates: Vec<usize> = groups
        .iter()
        .filter(|g| g.len() == 1)
        .map(|g| g[0])
        .collect();

    if !candidates.is_empty() {
        search(profile, candidates, &mut stats);
    } else if profile.functions.iter().all(|f| f.defined.is_none()) {
        debug!("All {} function bodies are ambiguous, pairing by report order", undeclared.len());
        stats.positional = pair_by_order(profile, &undeclared);
    }
    stats
}

/// Map one function at its declared site
fn map_declared(profile: &mut Profile, index: usize) -> bool {
    let Some(defined) = profile.functions[index].defined.clone() else {
        return false;
    };
    let Some(script) = profile.script_index(&defined.path) else {
        debug!(
            "{} is defined in {}, which was not profiled",
            profile.functions[index].name, defined.path
        );
        return false;
    };
    let mapped = try_map(profile, BlockId::Script(script), defined.line, index).is_some();
    debug!(
        "{} at {}:{} {}",
        profile.functions[index].name,
        defined.path,
        defined.line,
        if mapped { "mapped" } else { "did not match" }
    );
    mapped
}

/// Fill rows of mapped function tables from their script
///
/// Continuation rows in the script have no counterpart in the function
/// table and are skipped.
fn backfill_functions(profile: &mut Profile) {
    let Profile {
        scripts, functions, ..
    } = profile;
    for function in functions.iter_mut().filter(|f| f.mapped) {
        let Some(defined) = &function.defined else {
            continue;
        };
        let Some(script) = scripts.iter().find(|s| s.path == defined.path) else {
            continue;
        };
        let rows = script
            .lines
            .iter()
            .skip(defined.line)
            .filter(|l| !l.is_continuation());
        for (line, row) in function.lines.iter_mut().zip(rows) {
            line.fill_from(row);
        }
    }
}

/// SHA-512 of the concatenated body text
///
/// **Public** - identical bodies, whitespace included, share a digest
pub fn body_digest(lines: &[Line]) -> Vec<u8> {
    let mut hasher = Sha512::new();
    for line in lines {
        hasher.update(line.line.as_bytes());
    }
    hasher.finalize().to_vec()
}

/// Group functions by body digest, groups in first-seen order
pub fn group_by_digest(profile: &Profile, functions: &[usize]) -> Vec<Vec<usize>> {
    let mut index: HashMap<Vec<u8>, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &f in functions {
        let digest = body_digest(&profile.functions[f].lines);
        match index.get(&digest) {
            Some(&g) => groups[g].push(f),
            None => {
                index.insert(digest, groups.len());
                groups.push(vec![f]);
            }
        }
    }
    groups
}

/// Content search over every block with a worklist
///
/// `owners` records where each found function was placed. When a function
/// is found inside a block that is itself a placed function, that block
/// goes back to the pool and its owner back to the front of the queue, so
/// the newly filled rows reach the owner when the block is placed again.
/// Each (owner, function) pair propagates at most once.
fn search(profile: &mut Profile, mut pool: Vec<usize>, stats: &mut ReconcileStats) {
    let initial = pool.len();
    stats.initial_pool = initial;
    stats.peak_pool = initial;

    let mut queue: VecDeque<BlockId> = (0..profile.functions.len())
        .map(BlockId::Function)
        .chain((0..profile.scripts.len()).map(BlockId::Script))
        .collect();
    let mut owners: HashMap<usize, BlockId> = HashMap::new();
    let mut propagated: HashSet<(BlockId, usize)> = HashSet::new();

    while let Some(block) = queue.pop_front() {
        if pool.is_empty() {
            break;
        }
        let mut i = 0;
        while i + 1 < block_lines(profile, block).len() {
            let site = &block_lines(profile, block)[i];
            i += 1;
            if site.count.is_none() || !is_function_definition(&site.line) {
                continue;
            }

            let Some((pos, end)) = pool.iter().enumerate().find_map(|(pos, &f)| {
                if block == BlockId::Function(f) {
                    return None;
                }
                try_map(profile, block, i, f).map(|end| (pos, end))
            }) else {
                continue;
            };

            let found = pool.remove(pos);
            stats.searched += 1;
            i = end;
            owners.insert(found, block);
            debug!("{} found in {:?}", profile.functions[found].name, block);

            if let BlockId::Function(inner) = block {
                if let Some(&outer) = owners.get(&inner) {
                    if propagated.insert((outer, inner)) {
                        owners.remove(&inner);
                        profile.functions[inner].mapped = false;
                        pool.push(inner);
                        queue.push_front(outer);
                        stats.propagations += 1;
                        debug!("Propagating {} into {:?}", profile.functions[inner].name, outer);
                    }
                }
            }

            stats.peak_pool = stats.peak_pool.max(pool.len());
            debug_assert!(pool.len() <= initial, "candidate pool grew");
        }
    }
}

/// Pair ambiguous functions with definition sites in report order
///
/// Text is not compared, so identical bodies can trade counts. A function
/// whose body runs past the end of the script stays unmapped.
fn pair_by_order(profile: &mut Profile, ambiguous: &[usize]) -> usize {
    let mut pending = ambiguous.iter().copied();
    let mut paired = 0;
    let Profile {
        scripts, functions, ..
    } = profile;

    for script in scripts.iter_mut() {
        let mut i = 0;
        while i + 1 < script.lines.len() {
            let site = &script.lines[i];
            i += 1;
            if site.count.is_none() || !is_function_definition(&site.line) {
                continue;
            }
            let placed = pending.by_ref().find_map(|f| {
                map_positionally(&mut script.lines, i, &functions[f].lines).map(|end| (f, end))
            });
            match placed {
                Some((f, end)) => {
                    functions[f].mapped = true;
                    paired += 1;
                    i = end;
                }
                None => return paired,
            }
        }
    }
    paired
}

/// Map function `index` into `block` at row `start`, marking it on success
fn try_map(profile: &mut Profile, block: BlockId, start: usize, index: usize) -> Option<usize> {
    let body = std::mem::take(&mut profile.functions[index].lines);
    let end = map_lines(block_lines_mut(profile, block), start, &body);
    let function = &mut profile.functions[index];
    function.lines = body;
    if end.is_some() {
        function.mapped = true;
    }
    end
}

fn block_lines(profile: &Profile, block: BlockId) -> &[Line] {
    match block {
        BlockId::Script(i) => &profile.scripts[i].lines,
        BlockId::Function(i) => &profile.functions[i].lines,
    }
}

fn block_lines_mut(profile: &mut Profile, block: BlockId) -> &mut [Line] {
    match block {
        BlockId::Script(i) => &mut profile.scripts[i].lines,
        BlockId::Function(i) => &mut profile.functions[i].lines,
    }
}
