//! Modal, vim-style key input.
//!
//! Raw `crossterm` key events go in; typed [`VimCommand`]s come out.
//! The handler keeps a single pending-sequence record (numeric repeat
//! count plus an optional `g`/`z` prefix) with a one-second inactivity
//! deadline. Timeouts are deadline-based rather than timer-callback
//! based: the owning loop calls [`VimKeyHandler::tick`] each frame, and
//! `handle_key` re-checks the deadline itself, so nothing can fire after
//! the handler is dropped.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Inactivity window before a pending count/prefix is abandoned.
pub const SEQUENCE_TIMEOUT: Duration = Duration::from_secs(1);

/// Repeat counts are capped; a digit that would push past this is ignored.
const MAX_COUNT: u32 = 999;

/// Which view currently owns the shared navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavContext {
    Feed,
    Comments,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPosition {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YankTarget {
    Story,
    Comments,
}

/// Destinations reachable through the `g` prefix family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoTarget {
    Top,
    Home,
    New,
    Ask,
    Show,
    Jobs,
    Bookmarks,
}

impl GoTarget {
    /// Route the destination resolves to in the consuming router.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Top | Self::Home => "/",
            Self::New => "/new",
            Self::Ask => "/ask",
            Self::Show => "/show",
            Self::Jobs => "/jobs",
            Self::Bookmarks => "/bookmarks",
        }
    }
}

/// Semantic commands emitted by the interpreter. The consuming view owns
/// execution; the interpreter never calls back into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VimCommand {
    Navigate(Direction, u32),
    JumpToFirst,
    JumpToLast,
    JumpToPosition(ScreenPosition),
    PageScroll(Direction),
    CenterSelected,
    Open,
    OpenComments,
    ToggleBookmark,
    MarkAsRead,
    Refresh,
    Back,
    OpenUserProfile,
    YankUrl(YankTarget),
    CommentNavigate(Direction, u32),
    CommentParent,
    CommentNextSibling,
    CommentPrevSibling,
    CommentNextRoot,
    CommentPrevRoot,
    CommentToggleFold,
    CommentFold,
    CommentUnfold,
    CommentFoldAll,
    CommentUnfoldAll,
    CommentEnter,
    CommentExit,
    GoTo(GoTarget),
    Search,
    SearchNext,
    SearchPrev,
    ToggleTheme,
    ToggleDensity,
    ShowHelp,
    NextPage,
    PrevPage,
}

#[derive(Debug, Default)]
struct KeySequence {
    prefix: Option<char>,
    count: u32,
    deadline: Option<Instant>,
}

/// The interpreter itself. One instance per input scope; construct
/// directly in tests for isolation.
pub struct VimKeyHandler {
    seq: KeySequence,
    context: NavContext,
    enabled: bool,
    timeout: Duration,
}

impl VimKeyHandler {
    pub fn new(context: NavContext) -> Self {
        Self::with_timeout(context, SEQUENCE_TIMEOUT)
    }

    pub fn with_timeout(context: NavContext, timeout: Duration) -> Self {
        Self {
            seq: KeySequence::default(),
            context,
            enabled: true,
            timeout,
        }
    }

    pub fn context(&self) -> NavContext {
        self.context
    }

    pub fn set_context(&mut self, context: NavContext) {
        self.context = context;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Gate all processing. Disabling also drops any pending sequence so
    /// stale partial input cannot resume later.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    /// Drop the pending sequence unconditionally.
    pub fn clear(&mut self) {
        self.seq = KeySequence::default();
    }

    /// Expire the pending sequence if its inactivity deadline has passed.
    /// Call once per frame from the owning event loop.
    pub fn tick(&mut self) {
        if let Some(deadline) = self.seq.deadline
            && Instant::now() >= deadline
        {
            tracing::debug!("key sequence timeout, clearing");
            self.clear();
        }
    }

    /// Pending input for a status line, count before prefix ("12g").
    pub fn pending_display(&self) -> String {
        let mut display = String::new();
        if self.seq.count > 0 {
            display.push_str(&self.seq.count.to_string());
        }
        if let Some(prefix) = self.seq.prefix {
            display.push(prefix);
        }
        display
    }

    fn arm_deadline(&mut self) {
        self.seq.deadline = Some(Instant::now() + self.timeout);
    }

    /// Accumulate one digit into the repeat count. A leading zero and any
    /// result past the cap are rejected without touching the state.
    fn add_to_count(&mut self, digit: u32) -> bool {
        if self.seq.count == 0 && digit == 0 {
            return false;
        }
        let new_count = self.seq.count * 10 + digit;
        if new_count > MAX_COUNT {
            return false;
        }
        self.seq.count = new_count;
        self.arm_deadline();
        true
    }

    fn count_or_default(&self) -> u32 {
        if self.seq.count > 0 { self.seq.count } else { 1 }
    }

    fn has_pending(&self) -> bool {
        self.seq.prefix.is_some() || self.seq.count > 0
    }

    fn set_prefix(&mut self, prefix: char) {
        self.seq.prefix = Some(prefix);
        self.arm_deadline();
    }

    /// Resolve the second key of a `g` sequence.
    fn resolve_g(&self, key: char) -> Option<VimCommand> {
        match key {
            'g' => Some(VimCommand::JumpToFirst),
            't' => Some(VimCommand::GoTo(GoTarget::Top)),
            'h' => Some(VimCommand::GoTo(GoTarget::Home)),
            'n' => Some(VimCommand::GoTo(GoTarget::New)),
            'a' => Some(VimCommand::GoTo(GoTarget::Ask)),
            's' => Some(VimCommand::GoTo(GoTarget::Show)),
            'j' => Some(VimCommand::GoTo(GoTarget::Jobs)),
            'b' => Some(VimCommand::GoTo(GoTarget::Bookmarks)),
            'u' => Some(VimCommand::OpenUserProfile),
            _ => None,
        }
    }

    /// Resolve the second key of a `z` (folding) sequence.
    fn resolve_z(&self, key: char) -> Option<VimCommand> {
        match key {
            'z' => Some(VimCommand::CenterSelected),
            'a' => Some(VimCommand::CommentToggleFold),
            'c' => Some(VimCommand::CommentFold),
            'o' => Some(VimCommand::CommentUnfold),
            'm' => Some(VimCommand::CommentFoldAll),
            'r' => Some(VimCommand::CommentUnfoldAll),
            _ => None,
        }
    }

    /// Feed one key event through the state machine.
    ///
    /// Returns the command the key resolves to, or `None` when the key was
    /// swallowed (count/prefix accumulation, cancellation, or an
    /// unrecognized key).
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<VimCommand> {
        if !self.enabled {
            return None;
        }

        // A deadline that lapsed between frames must not let a stale
        // prefix or count leak into this key.
        self.tick();

        let has_ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // A pending prefix consumes the next key wholesale: recognized
        // keys fire, unrecognized keys are swallowed, and either way the
        // sequence (including any earlier count) is discarded. Go-to and
        // fold actions take no repeat count.
        if let Some(prefix) = self.seq.prefix {
            let resolved = match key.code {
                KeyCode::Char(c) => {
                    let c = c.to_ascii_lowercase();
                    match prefix {
                        'g' => self.resolve_g(c),
                        'z' => self.resolve_z(c),
                        _ => None,
                    }
                }
                _ => None,
            };
            self.clear();
            return resolved;
        }

        // Ctrl chords are their own tiny namespace; everything else with
        // ctrl held is ignored so terminal controls stay usable.
        if has_ctrl {
            return match key.code {
                KeyCode::Char('d') => {
                    self.clear();
                    Some(VimCommand::PageScroll(Direction::Down))
                }
                KeyCode::Char('u') => {
                    self.clear();
                    Some(VimCommand::PageScroll(Direction::Up))
                }
                KeyCode::Backspace => {
                    self.clear();
                    Some(VimCommand::Back)
                }
                _ => {
                    if self.has_pending() {
                        self.clear();
                    }
                    None
                }
            };
        }

        // Digit accumulation for repeat counts (e.g. 5j).
        if let KeyCode::Char(c) = key.code
            && c.is_ascii_digit()
        {
            self.add_to_count(c as u32 - '0' as u32);
            return None;
        }

        let count = self.count_or_default();
        let in_comments = self.context == NavContext::Comments;

        let command = match key.code {
            KeyCode::Char('j') => Some(if in_comments {
                VimCommand::CommentNavigate(Direction::Down, count)
            } else {
                VimCommand::Navigate(Direction::Down, count)
            }),
            KeyCode::Char('k') => Some(if in_comments {
                VimCommand::CommentNavigate(Direction::Up, count)
            } else {
                VimCommand::Navigate(Direction::Up, count)
            }),

            // Prefix starters.
            KeyCode::Char('g') => {
                self.set_prefix('g');
                return None;
            }
            KeyCode::Char('z') => {
                self.set_prefix('z');
                return None;
            }

            KeyCode::Char('G') => Some(VimCommand::JumpToLast),

            // Screen-relative jumps on the shifted row; the lowercase
            // variants belong to the comments context.
            KeyCode::Char('H') => Some(VimCommand::JumpToPosition(ScreenPosition::Top)),
            KeyCode::Char('M') => Some(VimCommand::JumpToPosition(ScreenPosition::Middle)),
            KeyCode::Char('L') => Some(VimCommand::JumpToPosition(ScreenPosition::Bottom)),
            KeyCode::Char('h') if in_comments => Some(VimCommand::CommentExit),
            KeyCode::Char('l') if in_comments => Some(VimCommand::CommentEnter),

            KeyCode::Char('m') => Some(VimCommand::MarkAsRead),
            KeyCode::Char('u') => Some(VimCommand::OpenUserProfile),
            KeyCode::Char('d') if self.context == NavContext::Feed => {
                Some(VimCommand::ToggleDensity)
            }

            KeyCode::Char('o') => Some(VimCommand::Open),
            KeyCode::Enter => Some(if in_comments {
                VimCommand::CommentToggleFold
            } else {
                VimCommand::Open
            }),

            KeyCode::Char('c') => Some(VimCommand::OpenComments),
            KeyCode::Char('b') => Some(VimCommand::ToggleBookmark),
            KeyCode::Char('r') => Some(VimCommand::Refresh),
            KeyCode::Char('t') => Some(VimCommand::ToggleTheme),

            KeyCode::Char('y') => Some(VimCommand::YankUrl(YankTarget::Story)),
            KeyCode::Char('Y') => Some(VimCommand::YankUrl(YankTarget::Comments)),

            KeyCode::Char('/') => Some(VimCommand::Search),
            KeyCode::Char('n') => Some(VimCommand::SearchNext),
            KeyCode::Char('N') => Some(VimCommand::SearchPrev),

            KeyCode::Char('[') => Some(if in_comments {
                VimCommand::CommentPrevSibling
            } else {
                VimCommand::PrevPage
            }),
            KeyCode::Char(']') => Some(if in_comments {
                VimCommand::CommentNextSibling
            } else {
                VimCommand::NextPage
            }),
            KeyCode::Char('{') => Some(VimCommand::CommentPrevRoot),
            KeyCode::Char('}') => Some(VimCommand::CommentNextRoot),

            KeyCode::Char('p') if in_comments => Some(VimCommand::CommentParent),

            KeyCode::Char('?') => Some(VimCommand::ShowHelp),

            // Escape cancels a pending sequence; with nothing pending it
            // means "go back".
            KeyCode::Esc => {
                if self.has_pending() {
                    self.clear();
                    return None;
                }
                Some(VimCommand::Back)
            }

            _ => {
                if self.has_pending() {
                    tracing::debug!(?key.code, "unknown key in sequence");
                    self.clear();
                }
                return None;
            }
        };

        if command.is_some() {
            self.clear();
        }
        command
    }
}

/// One row of the keyboard-shortcut reference shown by help views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub keys: &'static str,
    pub description: &'static str,
    pub category: ShortcutCategory,
    pub context: Option<NavContext>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutCategory {
    Navigation,
    Actions,
    GoTo,
    Comments,
    Other,
}

const fn shortcut(
    keys: &'static str,
    description: &'static str,
    category: ShortcutCategory,
) -> Shortcut {
    Shortcut {
        keys,
        description,
        category,
        context: None,
    }
}

const fn comment_shortcut(keys: &'static str, description: &'static str) -> Shortcut {
    Shortcut {
        keys,
        description,
        category: ShortcutCategory::Comments,
        context: Some(NavContext::Comments),
    }
}

/// The full shortcut reference, in display order.
pub fn shortcuts() -> &'static [Shortcut] {
    use ShortcutCategory::*;
    const SHORTCUTS: &[Shortcut] = &[
        shortcut("j / k", "Next / previous item", Navigation),
        shortcut("5j / 5k", "Move 5 items", Navigation),
        shortcut("gg", "Jump to first item", Navigation),
        shortcut("G", "Jump to last item", Navigation),
        shortcut("H / M / L", "Jump to top / middle / bottom of screen", Navigation),
        shortcut("Ctrl+d / Ctrl+u", "Scroll half page down / up", Navigation),
        shortcut("zz", "Center selected item", Navigation),
        shortcut("[ / ]", "Previous / next page", Navigation),
        shortcut("o / Enter", "Open story link", Actions),
        shortcut("c", "Open comments", Actions),
        shortcut("b", "Toggle bookmark", Actions),
        shortcut("m", "Mark as read", Actions),
        shortcut("r", "Refresh feed", Actions),
        shortcut("u", "View author profile", Actions),
        shortcut("y / Y", "Copy story / comments URL", Actions),
        shortcut("t", "Toggle theme", Actions),
        shortcut("d", "Toggle density", Actions),
        shortcut("/", "Search", Actions),
        shortcut("n / N", "Next / previous search result", Actions),
        shortcut("Esc", "Go back / cancel pending sequence", Actions),
        shortcut("?", "Show keyboard shortcuts", Actions),
        shortcut("gt / gh", "Go to top stories", GoTo),
        shortcut("gn", "Go to new stories", GoTo),
        shortcut("ga", "Go to Ask HN", GoTo),
        shortcut("gs", "Go to Show HN", GoTo),
        shortcut("gj", "Go to jobs", GoTo),
        shortcut("gb", "Go to bookmarks", GoTo),
        shortcut("gu", "Go to user profile", GoTo),
        comment_shortcut("l / h", "Enter thread / exit to parent"),
        comment_shortcut("p", "Jump to parent comment"),
        comment_shortcut("[ / ]", "Previous / next sibling"),
        comment_shortcut("{ / }", "Previous / next root comment"),
        comment_shortcut("Enter / za", "Toggle collapse"),
        comment_shortcut("zc / zo", "Collapse / expand thread"),
        comment_shortcut("zm / zr", "Collapse / expand all"),
    ];
    SHORTCUTS
}

/// Shortcuts applicable in a given context; `Global` sees everything.
pub fn shortcuts_for_context(context: NavContext) -> Vec<Shortcut> {
    shortcuts()
        .iter()
        .filter(|s| {
            context == NavContext::Global || s.context.is_none() || s.context == Some(context)
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    fn shifted(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn esc() -> KeyEvent {
        KeyEvent::new(KeyCode::Esc, KeyModifiers::empty())
    }

    #[test]
    fn count_then_motion() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);

        assert_eq!(handler.handle_key(key('5')), None);
        assert_eq!(handler.pending_display(), "5");
        assert_eq!(
            handler.handle_key(key('j')),
            Some(VimCommand::Navigate(Direction::Down, 5))
        );
        // State resets after the command fires.
        assert_eq!(handler.pending_display(), "");
        assert_eq!(
            handler.handle_key(key('j')),
            Some(VimCommand::Navigate(Direction::Down, 1))
        );
    }

    #[test]
    fn multi_digit_count() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        handler.handle_key(key('1'));
        handler.handle_key(key('0'));
        assert_eq!(
            handler.handle_key(key('k')),
            Some(VimCommand::Navigate(Direction::Up, 10))
        );
    }

    #[test]
    fn leading_zero_is_rejected() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        assert_eq!(handler.handle_key(key('0')), None);
        assert_eq!(handler.pending_display(), "");
        assert_eq!(
            handler.handle_key(key('j')),
            Some(VimCommand::Navigate(Direction::Down, 1))
        );
    }

    #[test]
    fn count_caps_at_999() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        for _ in 0..3 {
            handler.handle_key(key('9'));
        }
        assert_eq!(handler.pending_display(), "999");
        // A fourth digit would exceed the cap: ignored, count unchanged.
        handler.handle_key(key('9'));
        assert_eq!(handler.pending_display(), "999");
        assert_eq!(
            handler.handle_key(key('j')),
            Some(VimCommand::Navigate(Direction::Down, 999))
        );
    }

    #[test]
    fn goto_sequence_discards_count() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        handler.handle_key(key('3'));
        assert_eq!(handler.handle_key(key('g')), None);
        assert_eq!(handler.pending_display(), "3g");
        assert_eq!(
            handler.handle_key(key('t')),
            Some(VimCommand::GoTo(GoTarget::Top))
        );
        assert_eq!(GoTarget::Top.route(), "/");
        // The count did not survive into the next motion.
        assert_eq!(
            handler.handle_key(key('j')),
            Some(VimCommand::Navigate(Direction::Down, 1))
        );
    }

    #[test]
    fn gg_jumps_to_first() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        handler.handle_key(key('g'));
        assert_eq!(handler.handle_key(key('g')), Some(VimCommand::JumpToFirst));
        assert_eq!(handler.pending_display(), "");
    }

    #[test]
    fn goto_destinations() {
        let cases = [
            ('h', GoTarget::Home),
            ('n', GoTarget::New),
            ('a', GoTarget::Ask),
            ('s', GoTarget::Show),
            ('j', GoTarget::Jobs),
            ('b', GoTarget::Bookmarks),
        ];
        for (c, target) in cases {
            let mut handler = VimKeyHandler::new(NavContext::Feed);
            handler.handle_key(key('g'));
            assert_eq!(handler.handle_key(key(c)), Some(VimCommand::GoTo(target)));
        }

        let mut handler = VimKeyHandler::new(NavContext::Feed);
        handler.handle_key(key('g'));
        assert_eq!(
            handler.handle_key(key('u')),
            Some(VimCommand::OpenUserProfile)
        );
    }

    #[test]
    fn unknown_key_under_prefix_is_swallowed() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        handler.handle_key(key('g'));
        assert_eq!(handler.handle_key(key('x')), None);
        assert_eq!(handler.pending_display(), "");
        // And the swallowed key did not fire its unprefixed meaning later.
        assert_eq!(
            handler.handle_key(key('t')),
            Some(VimCommand::ToggleTheme)
        );
    }

    #[test]
    fn fold_sequences() {
        let mut handler = VimKeyHandler::new(NavContext::Comments);
        let cases = [
            ('z', VimCommand::CenterSelected),
            ('a', VimCommand::CommentToggleFold),
            ('c', VimCommand::CommentFold),
            ('o', VimCommand::CommentUnfold),
            ('m', VimCommand::CommentFoldAll),
            ('r', VimCommand::CommentUnfoldAll),
        ];
        for (c, expected) in cases {
            handler.handle_key(key('z'));
            assert_eq!(handler.handle_key(key(c)), Some(expected));
        }
    }

    #[test]
    fn sequence_times_out() {
        let mut handler =
            VimKeyHandler::with_timeout(NavContext::Feed, Duration::from_millis(5));
        handler.handle_key(key('g'));
        assert_eq!(handler.pending_display(), "g");

        thread::sleep(Duration::from_millis(10));
        handler.tick();
        assert_eq!(handler.pending_display(), "");

        // The next key is interpreted fresh, not as a prefix resolution.
        assert_eq!(handler.handle_key(key('t')), Some(VimCommand::ToggleTheme));
    }

    #[test]
    fn lapsed_deadline_is_checked_on_the_next_key_too() {
        let mut handler =
            VimKeyHandler::with_timeout(NavContext::Feed, Duration::from_millis(5));
        handler.handle_key(key('5'));
        thread::sleep(Duration::from_millis(10));
        // No tick in between: handle_key must expire the count itself.
        assert_eq!(
            handler.handle_key(key('j')),
            Some(VimCommand::Navigate(Direction::Down, 1))
        );
    }

    #[test]
    fn escape_cancels_pending_then_goes_back() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        handler.handle_key(key('4'));
        handler.handle_key(key('2'));
        assert_eq!(handler.handle_key(esc()), None);
        assert_eq!(handler.pending_display(), "");
        assert_eq!(handler.handle_key(esc()), Some(VimCommand::Back));
    }

    #[test]
    fn context_reroutes_shared_keys() {
        let mut handler = VimKeyHandler::new(NavContext::Comments);
        assert_eq!(
            handler.handle_key(key('j')),
            Some(VimCommand::CommentNavigate(Direction::Down, 1))
        );
        assert_eq!(handler.handle_key(key('l')), Some(VimCommand::CommentEnter));
        assert_eq!(handler.handle_key(key('h')), Some(VimCommand::CommentExit));
        assert_eq!(
            handler.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty())),
            Some(VimCommand::CommentToggleFold)
        );
        assert_eq!(
            handler.handle_key(key('[')),
            Some(VimCommand::CommentPrevSibling)
        );
        assert_eq!(handler.handle_key(key('p')), Some(VimCommand::CommentParent));

        handler.set_context(NavContext::Feed);
        assert_eq!(
            handler.handle_key(key('j')),
            Some(VimCommand::Navigate(Direction::Down, 1))
        );
        assert_eq!(handler.handle_key(key('[')), Some(VimCommand::PrevPage));
        assert_eq!(
            handler.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty())),
            Some(VimCommand::Open)
        );
        // l / h / p have no feed-context meaning.
        assert_eq!(handler.handle_key(key('l')), None);
        assert_eq!(handler.handle_key(key('p')), None);
    }

    #[test]
    fn shifted_jump_keys() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        assert_eq!(handler.handle_key(shifted('G')), Some(VimCommand::JumpToLast));
        assert_eq!(
            handler.handle_key(shifted('H')),
            Some(VimCommand::JumpToPosition(ScreenPosition::Top))
        );
        assert_eq!(
            handler.handle_key(shifted('M')),
            Some(VimCommand::JumpToPosition(ScreenPosition::Middle))
        );
        assert_eq!(
            handler.handle_key(shifted('L')),
            Some(VimCommand::JumpToPosition(ScreenPosition::Bottom))
        );
    }

    #[test]
    fn ctrl_chords_scroll() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        assert_eq!(
            handler.handle_key(ctrl('d')),
            Some(VimCommand::PageScroll(Direction::Down))
        );
        assert_eq!(
            handler.handle_key(ctrl('u')),
            Some(VimCommand::PageScroll(Direction::Up))
        );
        // Other ctrl chords are left alone (e.g. Ctrl+c).
        assert_eq!(handler.handle_key(ctrl('c')), None);
    }

    #[test]
    fn yank_variants() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        assert_eq!(
            handler.handle_key(key('y')),
            Some(VimCommand::YankUrl(YankTarget::Story))
        );
        assert_eq!(
            handler.handle_key(shifted('Y')),
            Some(VimCommand::YankUrl(YankTarget::Comments))
        );
    }

    #[test]
    fn search_keys() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        assert_eq!(handler.handle_key(key('/')), Some(VimCommand::Search));
        assert_eq!(handler.handle_key(key('n')), Some(VimCommand::SearchNext));
        assert_eq!(handler.handle_key(shifted('N')), Some(VimCommand::SearchPrev));
    }

    #[test]
    fn density_toggle_only_in_feed() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        assert_eq!(handler.handle_key(key('d')), Some(VimCommand::ToggleDensity));

        handler.set_context(NavContext::Comments);
        assert_eq!(handler.handle_key(key('d')), None);
    }

    #[test]
    fn disabling_clears_pending_state() {
        let mut handler = VimKeyHandler::new(NavContext::Feed);
        handler.handle_key(key('7'));
        handler.set_enabled(false);
        assert_eq!(handler.handle_key(key('j')), None);

        handler.set_enabled(true);
        assert_eq!(
            handler.handle_key(key('j')),
            Some(VimCommand::Navigate(Direction::Down, 1))
        );
    }

    #[test]
    fn shortcut_reference_covers_contexts() {
        let all = shortcuts();
        assert!(all.len() > 30);

        let feed = shortcuts_for_context(NavContext::Feed);
        assert!(feed.iter().all(|s| s.context != Some(NavContext::Comments)));

        let global = shortcuts_for_context(NavContext::Global);
        assert_eq!(global.len(), all.len());
    }
}
