/// Navigation position within a loaded deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    NoDeck,
    AtSlide(usize),
}

/// Which navigation controls are currently actionable. A pure function of
/// the cursor position and slide count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affordances {
    pub can_previous: bool,
    pub can_next: bool,
}

/// Bounded slide cursor.
///
/// Whenever a deck is loaded the invariant `0 <= current < slide_count`
/// holds; transitions that would step outside the bounds are no-ops, not
/// errors. Each mutating method returns whether the position changed.
#[derive(Debug)]
pub struct Cursor {
    state: NavState,
    slide_count: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            state: NavState::NoDeck,
            slide_count: 0,
        }
    }

    /// Load a deck of `slide_count` slides and move to the first one.
    ///
    /// An empty deck is rejected: the cursor stays unloaded and `false` is
    /// returned so the caller can surface the failed load.
    #[must_use]
    pub fn load(&mut self, slide_count: usize) -> bool {
        if slide_count == 0 {
            self.state = NavState::NoDeck;
            self.slide_count = 0;
            return false;
        }
        self.state = NavState::AtSlide(0);
        self.slide_count = slide_count;
        true
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn current(&self) -> Option<usize> {
        match self.state {
            NavState::AtSlide(i) => Some(i),
            NavState::NoDeck => None,
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn next(&mut self) -> bool {
        match self.state {
            NavState::AtSlide(i) if i + 1 < self.slide_count => {
                self.state = NavState::AtSlide(i + 1);
                true
            }
            _ => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match self.state {
            NavState::AtSlide(i) if i > 0 => {
                self.state = NavState::AtSlide(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Jump to slide `index`. Out-of-range requests leave the state
    /// untouched and report `false`.
    pub fn go_to(&mut self, index: usize) -> bool {
        match self.state {
            NavState::AtSlide(i) if index < self.slide_count && index != i => {
                self.state = NavState::AtSlide(index);
                true
            }
            _ => false,
        }
    }

    pub fn affordances(&self) -> Affordances {
        match self.state {
            NavState::AtSlide(i) => Affordances {
                can_previous: i > 0,
                can_next: i + 1 < self.slide_count,
            },
            NavState::NoDeck => Affordances::default(),
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
