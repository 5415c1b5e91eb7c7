use std::collections::VecDeque;

/// Most recently typed characters, oldest evicted first.
///
/// Only its length matters: a contact save counts as confident once enough
/// characters have been typed since the last manual toggle.
#[derive(Debug, Clone)]
pub struct DetectionBuffer {
    cap: usize,
    buf: VecDeque<char>,
}

impl DetectionBuffer {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            buf: VecDeque::with_capacity(cap),
        }
    }

    pub fn push(&mut self, ch: char) {
        self.buf.push_back(ch);
        while self.buf.len() > self.cap {
            let _ = self.buf.pop_front();
        }
    }

    pub fn push_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.push(ch);
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn has_at_least(&self, n: usize) -> bool {
        self.buf.len() >= n
    }

    pub fn contents(&self) -> String {
        self.buf.iter().collect()
    }
}

impl Default for DetectionBuffer {
    fn default() -> Self {
        Self::new(10)
    }
}
