/// FAQ list where at most one answer is expanded at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accordion {
    panels: usize,
    open: Option<usize>,
}

impl Accordion {
    pub fn new(panels: usize) -> Self {
        Self { panels, open: None }
    }

    pub fn panels(&self) -> usize {
        self.panels
    }

    pub fn open(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, panel: usize) -> bool {
        self.open == Some(panel)
    }

    /// Opens `panel`, closing any other, or closes it if it is already open.
    /// Out-of-range panels are ignored.
    pub fn toggle(&mut self, panel: usize) {
        if panel >= self.panels {
            return;
        }
        self.open = if self.is_open(panel) { None } else { Some(panel) };
    }
}
