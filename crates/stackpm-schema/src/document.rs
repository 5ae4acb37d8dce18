/// Raw lines of a hand-edited text file, each with its terminator kept so that
/// untouched lines are written back byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TextDocument {
    lines: Vec<String>,
}

impl TextDocument {
    pub(crate) fn parse(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_owned).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    /// Line content without its `\n` / `\r\n` terminator.
    pub(crate) fn text(&self, idx: usize) -> &str {
        strip_terminator(&self.lines[idx])
    }

    pub(crate) fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str).map(strip_terminator)
    }

    pub(crate) fn replace(&mut self, idx: usize, text: &str) {
        self.lines[idx] = format!("{text}\n");
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.terminate_last();
        self.lines.push(format!("{text}\n"));
    }

    pub(crate) fn insert(&mut self, idx: usize, text: &str) {
        if idx >= self.lines.len() {
            self.push(text);
            return;
        }
        self.lines.insert(idx, format!("{text}\n"));
    }

    /// Drop every line whose text matches; returns how many were removed.
    pub(crate) fn remove_where(&mut self, mut pred: impl FnMut(usize, &str) -> bool) -> usize {
        let before = self.lines.len();
        let mut idx = 0;
        self.lines.retain(|line| {
            let keep = !pred(idx, strip_terminator(line));
            idx += 1;
            keep
        });
        before - self.lines.len()
    }

    fn terminate_last(&mut self) {
        if let Some(last) = self.lines.last_mut() {
            if !last.ends_with('\n') {
                last.push('\n');
            }
        }
    }

    pub(crate) fn render(&self) -> String {
        self.lines.concat()
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
