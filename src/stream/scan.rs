//! Incremental value-boundary scanning over a growing buffer.
//!
//! The scanner walks tags and length fields without building values, and
//! keeps its position between calls so each buffered byte is examined once.

use crate::codec::typecode::{self, TypeCode};

/// An open container awaiting more items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Items left in a fixed list, or keys plus values left in a fixed dict.
    Count(usize),
    /// Unbounded list; closed by the terminator at any item position.
    List,
    /// Unbounded dict; closed by the terminator only where a key would start.
    Dict { key_next: bool },
}

enum Step {
    Leaf(usize),
    Open(Frame),
    Partial,
    Invalid,
}

/// Tracks how far the buffered prefix of one value has been checked.
#[derive(Debug, Default)]
pub(crate) struct Scanner {
    pos: usize,
    stack: Vec<Frame>,
    ready: bool,
}

impl Scanner {
    /// Returns `true` once `buf` holds a whole value, or once it holds
    /// something the decoder will reject. `buf` must extend the bytes passed
    /// to previous calls since the last [`reset`](Self::reset).
    pub(crate) fn scan(&mut self, buf: &[u8], max_depth: usize) -> bool {
        while !self.ready {
            let Some(&tag) = buf.get(self.pos) else {
                return false;
            };

            if tag == typecode::TERM && self.closes_top() {
                self.stack.pop();
                self.pos += 1;
            } else {
                if self.stack.len() > max_depth {
                    self.ready = true;
                    break;
                }
                match step(buf, self.pos, tag) {
                    Step::Leaf(len) => {
                        let Some(end) = self.pos.checked_add(len) else {
                            self.ready = true;
                            break;
                        };
                        if end > buf.len() {
                            return false;
                        }
                        self.pos = end;
                        self.count_item();
                    }
                    Step::Open(frame) => {
                        self.pos += 1;
                        self.count_item();
                        self.stack.push(frame);
                    }
                    Step::Partial => return false,
                    Step::Invalid => {
                        self.ready = true;
                        break;
                    }
                }
            }

            while self.stack.last() == Some(&Frame::Count(0)) {
                self.stack.pop();
            }
            if self.stack.is_empty() {
                self.ready = true;
            }
        }
        true
    }

    pub(crate) fn reset(&mut self) {
        self.pos = 0;
        self.stack.clear();
        self.ready = false;
    }

    fn closes_top(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame::List | Frame::Dict { key_next: true })
        )
    }

    fn count_item(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::Count(n)) => *n -= 1,
            Some(Frame::Dict { key_next }) => *key_next = !*key_next,
            Some(Frame::List) | None => {}
        }
    }
}

fn step(buf: &[u8], pos: usize, tag: u8) -> Step {
    let Some(code) = typecode::classify(tag) else {
        return Step::Invalid;
    };
    match code {
        TypeCode::FixedInt(_) | TypeCode::True | TypeCode::False | TypeCode::Null => Step::Leaf(1),
        TypeCode::Int1 => Step::Leaf(2),
        TypeCode::Int2 => Step::Leaf(3),
        TypeCode::Int4 | TypeCode::Float32 => Step::Leaf(5),
        TypeCode::Int8 | TypeCode::Float64 => Step::Leaf(9),
        TypeCode::FixedStr(len) => Step::Leaf(1 + len),
        TypeCode::LengthDigit(_) => string_size(buf, pos),
        TypeCode::BigNumber => match string_size(buf, pos + 1) {
            Step::Leaf(len) => Step::Leaf(1 + len),
            other => other,
        },
        TypeCode::FixedList(count) => Step::Open(Frame::Count(count)),
        TypeCode::FixedDict(pairs) => Step::Open(Frame::Count(2 * pairs)),
        TypeCode::List => Step::Open(Frame::List),
        TypeCode::Dict => Step::Open(Frame::Dict { key_next: true }),
        TypeCode::Term => Step::Invalid,
    }
}

/// Size of a string-framed payload starting at `pos`, header included.
fn string_size(buf: &[u8], pos: usize) -> Step {
    let Some(&tag) = buf.get(pos) else {
        return Step::Partial;
    };
    match typecode::classify(tag) {
        Some(TypeCode::FixedStr(len)) => Step::Leaf(1 + len),
        Some(TypeCode::LengthDigit(first)) => {
            let mut len = usize::from(first);
            let mut at = pos + 1;
            loop {
                let Some(&b) = buf.get(at) else {
                    return Step::Partial;
                };
                at += 1;
                if b == typecode::LENGTH_DELIMITER {
                    return match (at - pos).checked_add(len) {
                        Some(size) => Step::Leaf(size),
                        None => Step::Invalid,
                    };
                }
                if !b.is_ascii_digit() {
                    return Step::Invalid;
                }
                match len.checked_mul(10).and_then(|l| l.checked_add(usize::from(b - b'0'))) {
                    Some(next) => len = next,
                    None => return Step::Invalid,
                }
            }
        }
        _ => Step::Invalid,
    }
}
