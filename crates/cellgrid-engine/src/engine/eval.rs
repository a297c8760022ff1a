//! Formula evaluation.
//!
//! A cell's value is resolved depth-first over the implicit reference graph:
//! references are looked up on demand, results are memoized for the current
//! pass, and a visiting set guards against cycles. Two formula shapes exist:
//!
//! - `SUM(A1:B5)` sums the inclusive rectangle (case-insensitive keyword)
//! - anything else is arithmetic: `A1`-style tokens are replaced by the
//!   referenced values and the result goes through [`expr::evaluate`]
//!
//! Failures become [`Sentinel`] values. A cell that depends on itself
//! resolves to `#CIRC!`, and so does every formula that reaches it.
//!
//! The depth-first walk runs on an explicit stack of [`Frame`]s, so a
//! reference chain may run through every cell of the grid.

use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use super::cell::CellStore;
use super::cell_ref::CellRef;
use super::expr;
use super::format::format_number;
use super::value::{Sentinel, Value};

/// Per-pass cache of resolved values.
pub type Memo = HashMap<CellRef, Value>;

/// Addresses on the active resolution path.
pub type Visiting = HashSet<CellRef>;

fn sum_fn_re() -> &'static Regex {
    static SUM_RE: OnceLock<Regex> = OnceLock::new();
    SUM_RE.get_or_init(|| {
        Regex::new(r"(?i)^SUM\(([A-Z][0-9]+):([A-Z][0-9]+)\)$").expect("sum regex must compile")
    })
}

fn cell_token_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| Regex::new(r"[A-Za-z][0-9]+").expect("cell token regex must compile"))
}

fn arithmetic_text_re() -> &'static Regex {
    static ARITH_RE: OnceLock<Regex> = OnceLock::new();
    ARITH_RE.get_or_init(|| {
        Regex::new(r"^[0-9+\-*/().\s]+$").expect("arithmetic text regex must compile")
    })
}

/// Inclusive rectangle named by a `SUM` range. Corners may come in any order.
#[derive(Clone, Copy, Debug)]
struct Rect {
    min_row: usize,
    min_col: usize,
    max_row: usize,
    max_col: usize,
}

impl Rect {
    fn from_corners(start: &str, end: &str) -> Option<Rect> {
        let start = CellRef::from_str(start)?;
        let end = CellRef::from_str(end)?;
        Some(Rect {
            min_row: start.row().min(end.row()),
            min_col: start.col().min(end.col()),
            max_row: start.row().max(end.row()),
            max_col: start.col().max(end.col()),
        })
    }

    /// Member count, or `None` if it does not fit in a `usize`.
    fn len(&self) -> Option<usize> {
        (self.max_row - self.min_row)
            .checked_add(1)?
            .checked_mul(self.max_col - self.min_col + 1)
    }

    fn contains(&self, cell_ref: &CellRef) -> bool {
        (self.min_row..=self.max_row).contains(&cell_ref.row())
            && (self.min_col..=self.max_col).contains(&cell_ref.col())
    }
}

/// A formula cell whose reads are being resolved.
struct Frame<'a> {
    cell_ref: CellRef,
    body: &'a str,
    reads: Vec<CellRef>,
    next: usize,
}

/// Resolves cell values against a borrowed [`CellStore`].
pub struct FormulaEvaluator<'a> {
    store: &'a CellStore,
}

impl<'a> FormulaEvaluator<'a> {
    pub fn new(store: &'a CellStore) -> Self {
        FormulaEvaluator { store }
    }

    /// Resolve the value of `cell_ref` within the current pass.
    pub fn evaluate(&self, cell_ref: &CellRef, memo: &mut Memo, visiting: &mut Visiting) -> Value {
        if let Some(cached) = memo.get(cell_ref) {
            return cached.clone();
        }
        if visiting.contains(cell_ref) {
            log::trace!("{cell_ref} is already being resolved");
            return Sentinel::Circular.into();
        }

        let raw = match self.store.get(cell_ref) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Value::empty(),
        };

        let Some(body) = raw.strip_prefix('=') else {
            let value = Value::Text(raw.to_string());
            memo.insert(*cell_ref, value.clone());
            return value;
        };

        self.resolve(*cell_ref, body, memo, visiting)
    }

    /// Resolve a raw value that does not occupy a cell.
    pub fn evaluate_raw(&self, raw: &str, memo: &mut Memo, visiting: &mut Visiting) -> Value {
        if raw.is_empty() {
            return Value::empty();
        }
        match raw.strip_prefix('=') {
            Some(body) => self.evaluate_body(body, memo, visiting),
            None => Value::Text(raw.to_string()),
        }
    }

    /// Walk the formulas `root` reads, deepest first, then `root` itself.
    ///
    /// A frame is evaluated once each of its reads is memoized, a literal,
    /// empty, or on the path. Reads are visited in the order the body
    /// evaluates them, so memo contents match a plain recursive walk.
    fn resolve(
        &self,
        root: CellRef,
        body: &'a str,
        memo: &mut Memo,
        visiting: &mut Visiting,
    ) -> Value {
        visiting.insert(root);
        let mut stack = vec![self.frame(root, body)];
        let mut value = Value::empty();

        while let Some(frame) = stack.last_mut() {
            if let Some(pending) = self.next_pending(frame, memo, visiting) {
                visiting.insert(pending.cell_ref);
                stack.push(pending);
                continue;
            }

            let (cell_ref, body) = (frame.cell_ref, frame.body);
            stack.pop();
            value = self.evaluate_body(body, memo, visiting);
            visiting.remove(&cell_ref);

            log::trace!("{cell_ref} = {value}");
            memo.insert(cell_ref, value.clone());
        }
        value
    }

    fn frame(&self, cell_ref: CellRef, body: &'a str) -> Frame<'a> {
        Frame {
            cell_ref,
            body,
            reads: self.reads(body),
            next: 0,
        }
    }

    /// Next formula `frame` reads that has not been resolved yet.
    fn next_pending(
        &self,
        frame: &mut Frame<'a>,
        memo: &Memo,
        visiting: &Visiting,
    ) -> Option<Frame<'a>> {
        while let Some(&read) = frame.reads.get(frame.next) {
            frame.next += 1;
            if memo.contains_key(&read) || visiting.contains(&read) {
                continue;
            }
            if let Some(body) = self.store.get(&read).and_then(|raw| raw.strip_prefix('=')) {
                return Some(self.frame(read, body));
            }
        }
        None
    }

    /// Cells a formula body looks up, in evaluation order.
    fn reads(&self, body: &str) -> Vec<CellRef> {
        if let Some(caps) = sum_fn_re().captures(body) {
            return match Rect::from_corners(&caps[1], &caps[2]) {
                Some(rect) => self.populated_members(&rect),
                None => Vec::new(),
            };
        }
        cell_token_re()
            .find_iter(body)
            .filter_map(|token| CellRef::from_str(token.as_str()))
            .collect()
    }

    /// Populated cells inside `rect`, row-major.
    ///
    /// Whichever of the rectangle and the store is smaller gets scanned.
    fn populated_members(&self, rect: &Rect) -> Vec<CellRef> {
        if rect.len().is_some_and(|len| len <= self.store.len()) {
            (rect.min_row..=rect.max_row)
                .flat_map(|row| {
                    (rect.min_col..=rect.max_col).map(move |col| CellRef::new(col, row))
                })
                .filter(|cell_ref| self.store.get(cell_ref).is_some())
                .collect()
        } else {
            let mut members: Vec<CellRef> = self
                .store
                .iter()
                .map(|(cell_ref, _)| *cell_ref)
                .filter(|cell_ref| rect.contains(cell_ref))
                .collect();
            members.sort_unstable();
            members
        }
    }

    fn evaluate_body(&self, body: &str, memo: &mut Memo, visiting: &mut Visiting) -> Value {
        if let Some(caps) = sum_fn_re().captures(body) {
            return self.range_sum(&caps[1], &caps[2], memo, visiting);
        }
        self.arithmetic(body, memo, visiting)
    }

    fn range_sum(&self, start: &str, end: &str, memo: &mut Memo, visiting: &Visiting) -> Value {
        let Some(rect) = Rect::from_corners(start, end) else {
            return Value::Number(0.0);
        };

        // Empty members add nothing, so only stored cells are visited.
        let mut sum = 0.0;
        for member in self.populated_members(&rect) {
            let value = match memo.get(&member) {
                Some(cached) => cached.clone(),
                None => {
                    // Each summand gets its own copy of the path so siblings
                    // cannot see each other's recursion state.
                    let mut branch = visiting.clone();
                    self.evaluate(&member, memo, &mut branch)
                }
            };
            if value.sentinel() == Some(Sentinel::Circular) {
                return value;
            }
            if let Some(n) = value.as_number() {
                sum += n;
            }
        }
        Value::Number(sum)
    }

    fn arithmetic(&self, body: &str, memo: &mut Memo, visiting: &mut Visiting) -> Value {
        let mut circular = false;
        let substituted = cell_token_re().replace_all(body, |caps: &Captures| {
            let Some(target) = CellRef::from_str(&caps[0]) else {
                return "0".to_string();
            };
            let value = self.evaluate(&target, memo, visiting);
            if value.sentinel() == Some(Sentinel::Circular) {
                circular = true;
            }
            match value.as_number() {
                Some(n) => format_number(n),
                None => "0".to_string(),
            }
        });

        if circular {
            return Sentinel::Circular.into();
        }
        if !arithmetic_text_re().is_match(&substituted) {
            log::debug!("rejecting {substituted:?}: outside the arithmetic grammar");
            return Sentinel::Name.into();
        }

        match expr::evaluate(&substituted) {
            Ok(n) if n.is_finite() => Value::Number(n),
            Ok(n) => {
                log::debug!("{substituted:?} evaluated to non-finite {n}");
                Sentinel::Eval.into()
            }
            Err(err) => {
                log::debug!("{substituted:?} failed to evaluate: {err}");
                Sentinel::Eval.into()
            }
        }
    }
}
