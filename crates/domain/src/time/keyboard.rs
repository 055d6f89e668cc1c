//! Keyboard time entry
//!
//! Typed digits and AM/PM keys are validated against a prefix tree of legal
//! partial times. The tree is built once per `TimePickerConfig`; the typed
//! buffer is re-walked from the root on every query so deleting a key rewinds
//! exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use super::config::TimePickerConfig;
use super::timepoint::{AmPm, Timepoint};
use crate::error::PickerError;

// =============================================================================
// Tokens
// =============================================================================

/// A single key the time entry understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    Digit(u8),
    Am,
    Pm,
}

impl Token {
    /// Digit token, if `value` is a single decimal digit.
    pub fn digit(value: u8) -> Option<Token> {
        (value <= 9).then_some(Token::Digit(value))
    }

    pub fn am_pm(half: AmPm) -> Token {
        match half {
            AmPm::Am => Token::Am,
            AmPm::Pm => Token::Pm,
        }
    }

    pub fn is_am_pm(&self) -> bool {
        matches!(self, Token::Am | Token::Pm)
    }

    fn bit(&self) -> u16 {
        match *self {
            Token::Digit(d) if d <= 9 => 1 << d,
            Token::Digit(_) => 0,
            Token::Am => 1 << 10,
            Token::Pm => 1 << 11,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Digit(d) => write!(f, "{}", d),
            Token::Am => write!(f, "AM"),
            Token::Pm => write!(f, "PM"),
        }
    }
}

/// Set of tokens a node accepts, one bit per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TokenSet(u16);

impl TokenSet {
    fn digits(range: RangeInclusive<u8>) -> Self {
        Self(range.filter_map(Token::digit).fold(0, |bits, t| bits | t.bit()))
    }

    fn am_pm() -> Self {
        Self(Token::Am.bit() | Token::Pm.bit())
    }

    fn contains(&self, token: Token) -> bool {
        let bit = token.bit();
        bit != 0 && self.0 & bit == bit
    }
}

// =============================================================================
// AM/PM key detection
// =============================================================================

/// The characters that type AM and PM in the current locale.
///
/// They are the first characters, after lower-casing, at which the localized
/// AM and PM labels differ ("a"/"p" for English).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmPmKeys {
    am: char,
    pm: char,
}

impl Default for AmPmKeys {
    fn default() -> Self {
        Self { am: 'a', pm: 'p' }
    }
}

impl AmPmKeys {
    /// Derives the keys from localized labels.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::Validation` if the labels share every character
    /// they have in common position, so no single key tells them apart.
    pub fn from_labels(am_label: &str, pm_label: &str) -> Result<Self, PickerError> {
        let am = am_label.to_lowercase();
        let pm = pm_label.to_lowercase();
        am.chars()
            .zip(pm.chars())
            .find(|(a, p)| a != p)
            .map(|(am, pm)| Self { am, pm })
            .ok_or_else(|| {
                PickerError::validation(format!(
                    "AM label {:?} and PM label {:?} have no distinguishing character",
                    am_label, pm_label
                ))
            })
    }

    pub fn am(&self) -> char {
        self.am
    }

    pub fn pm(&self) -> char {
        self.pm
    }

    /// Maps a typed character to a token, if it is one.
    pub fn token_for(&self, key: char) -> Option<Token> {
        if let Some(d) = key.to_digit(10) {
            return Token::digit(d as u8);
        }
        let mut lower = key.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(c), None) if c == self.am => Some(Token::Am),
            (Some(c), None) if c == self.pm => Some(Token::Pm),
            _ => None,
        }
    }
}

// =============================================================================
// Legal time tree
// =============================================================================

/// Index of a node inside a `LegalTimeTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    accepted: TokenSet,
    children: Vec<NodeId>,
}

/// Prefix tree of legal partial keyboard times.
///
/// Every path from the root spells a prefix that can still become a legal
/// time. Sub-trees such as "two minute digits" are shared between parents, so
/// nodes live in an arena and refer to each other by `NodeId`; there are no
/// cycles.
#[derive(Debug, Clone)]
pub struct LegalTimeTree {
    config: TimePickerConfig,
    nodes: Vec<Node>,
}

impl LegalTimeTree {
    pub fn new(config: TimePickerConfig) -> Self {
        let mut tree = Self {
            config,
            nodes: vec![Node {
                accepted: TokenSet::default(),
                children: Vec::new(),
            }],
        };

        match (config.is_24_hour_mode(), config.minutes_enabled()) {
            (true, false) => tree.build_24_hour_hours_only(),
            (false, false) => tree.build_12_hour_hours_only(),
            (true, true) => tree.build_24_hour(),
            (false, true) => tree.build_12_hour(),
        }

        tracing::debug!(nodes = tree.nodes.len(), ?config, "Built legal time tree");
        tree
    }

    pub fn config(&self) -> TimePickerConfig {
        self.config
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The child of `node` reached by typing `token`, if that key is legal there.
    pub fn can_reach(&self, node: NodeId, token: Token) -> Option<NodeId> {
        self.nodes
            .get(node.0)?
            .children
            .iter()
            .copied()
            .find(|child| self.nodes[child.0].accepted.contains(token))
    }

    /// Whether `buffer` is a legal time or can still become one.
    pub fn is_legal_so_far(&self, buffer: &[Token]) -> bool {
        self.walk(buffer).is_some()
    }

    /// Whether `buffer` is a complete legal time as it stands.
    pub fn is_fully_legal(&self, buffer: &[Token]) -> bool {
        if !self.is_legal_so_far(buffer) {
            return false;
        }
        if !self.config.is_24_hour_mode() {
            // The tree only offers AM/PM where the digits before it form a time.
            return buffer.iter().any(Token::is_am_pm);
        }
        match self.decode(buffer) {
            Ok(decoded) => {
                let hour_ok = decoded.hour.is_some_and(|h| h < 24);
                let minute_ok =
                    !self.config.minutes_enabled() || decoded.minute.is_some_and(|m| m < 60);
                let second_ok =
                    !self.config.seconds_enabled() || decoded.second.is_some_and(|s| s < 60);
                hour_ok && minute_ok && second_ok
            }
            Err(_) => false,
        }
    }

    /// Whether appending `token` to `buffer` would be accepted.
    ///
    /// Rejected once the buffer is complete (every digit slot filled in 24-hour
    /// mode, AM/PM typed in 12-hour mode) or when the key is illegal there.
    pub fn accepts(&self, buffer: &[Token], token: Token) -> bool {
        let complete = if self.config.is_24_hour_mode() {
            buffer.len() >= self.config.digit_slots()
        } else {
            self.is_fully_legal(buffer)
        };
        if complete {
            return false;
        }
        self.walk(buffer)
            .and_then(|node| self.can_reach(node, token))
            .is_some()
    }

    /// Splits `buffer` into hour, minute, second and AM/PM.
    ///
    /// Digits are read from the end in two-digit groups (seconds, then minutes,
    /// when enabled); whatever is left is the hour. A 12-hour buffer ending in
    /// AM/PM may leave minutes and seconds untyped; they decode as zero.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::MalformedBuffer` if the tree would not have
    /// accepted `buffer`.
    pub fn decode(&self, buffer: &[Token]) -> Result<DecodedTime, PickerError> {
        if !self.is_legal_so_far(buffer) {
            return Err(PickerError::malformed_buffer(format!(
                "{} is not a legal key sequence",
                format_buffer(buffer)
            )));
        }

        let (am_pm, digit_tokens) = match buffer.split_last() {
            Some((Token::Am, rest)) => (Some(AmPm::Am), rest),
            Some((Token::Pm, rest)) => (Some(AmPm::Pm), rest),
            _ => (None, buffer),
        };
        let mut digits = Vec::with_capacity(digit_tokens.len());
        for token in digit_tokens {
            match token {
                Token::Digit(d) => digits.push(*d),
                _ => {
                    return Err(PickerError::malformed_buffer(format!(
                        "{} has AM/PM before the last key",
                        format_buffer(buffer)
                    )))
                }
            }
        }

        let minutes = self.config.minutes_enabled();
        let seconds = self.config.seconds_enabled();
        let (typed_minutes, typed_seconds) = match am_pm {
            // Completed early: the digit count tells which fields were typed.
            Some(_) => (minutes && digits.len() >= 3, seconds && digits.len() >= 5),
            None => (minutes, seconds),
        };

        let mut rest = digits.as_slice();
        let second = if typed_seconds { take_group(&mut rest) } else { None };
        let minute = if typed_minutes { take_group(&mut rest) } else { None };
        let hour = take_group(&mut rest);
        if !rest.is_empty() {
            return Err(PickerError::malformed_buffer(format!(
                "{} has more hour digits than fit",
                format_buffer(buffer)
            )));
        }

        let filled = |group: Option<DigitGroup>, enabled: bool| match (group, am_pm) {
            (Some(group), _) => Some(group.value),
            (None, Some(_)) if enabled => Some(0),
            (None, _) => None,
        };

        Ok(DecodedTime {
            hour: hour.map(|g| g.value),
            minute: filled(minute, minutes),
            second: filled(second, seconds),
            am_pm,
            entered_zeros: EnteredZeros {
                hour: hour.is_some_and(|g| g.leading_zero),
                minute: minute.is_some_and(|g| g.leading_zero),
                second: second.is_some_and(|g| g.leading_zero),
            },
        })
    }

    // Construction

    fn add_node(&mut self, accepted: TokenSet) -> NodeId {
        self.nodes.push(Node {
            accepted,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    fn add_root_child(&mut self, accepted: TokenSet) -> NodeId {
        let node = self.add_node(accepted);
        self.add_child(self.root(), node);
        node
    }

    fn walk(&self, buffer: &[Token]) -> Option<NodeId> {
        buffer
            .iter()
            .try_fold(self.root(), |node, &token| self.can_reach(node, token))
    }

    fn build_24_hour_hours_only(&mut self) {
        // 00-19
        let first = self.add_root_child(TokenSet::digits(0..=1));
        let second = self.add_node(TokenSet::digits(0..=9));
        self.add_child(first, second);

        // 20-23
        let first = self.add_root_child(TokenSet::digits(2..=2));
        let second = self.add_node(TokenSet::digits(0..=3));
        self.add_child(first, second);
    }

    fn build_12_hour_hours_only(&mut self) {
        let am_pm = self.add_node(TokenSet::am_pm());

        // 1am, 10-12pm
        let first = self.add_root_child(TokenSet::digits(1..=1));
        self.add_child(first, am_pm);
        let second = self.add_node(TokenSet::digits(0..=2));
        self.add_child(first, second);
        self.add_child(second, am_pm);

        // 2am-9pm
        let first = self.add_root_child(TokenSet::digits(2..=9));
        self.add_child(first, am_pm);
    }

    fn build_24_hour(&mut self) {
        let minute_first = self.add_node(TokenSet::digits(0..=5));
        let minute_second = self.add_node(TokenSet::digits(0..=9));
        self.add_child(minute_first, minute_second);

        let seconds_first = if self.config.seconds_enabled() {
            let seconds_first = self.add_node(TokenSet::digits(0..=5));
            let seconds_second = self.add_node(TokenSet::digits(0..=9));
            self.add_child(seconds_first, seconds_second);
            self.add_child(minute_second, seconds_first);
            Some(seconds_first)
        } else {
            None
        };

        // Hours 0-1 or 00-15, then minutes: 0:55, 15:58
        let first = self.add_root_child(TokenSet::digits(0..=1));
        let second = self.add_node(TokenSet::digits(0..=5));
        self.add_child(first, second);
        self.add_child(second, minute_first);
        // Single-digit hour with minutes 06-59 typed as "0:56" or "1:08"
        let third = self.add_node(TokenSet::digits(6..=9));
        self.add_child(second, third);
        if let Some(seconds_first) = seconds_first {
            self.add_child(third, seconds_first);
        }

        // Hours 06-19: 06:50, 18:20
        let second = self.add_node(TokenSet::digits(6..=9));
        self.add_child(first, second);
        self.add_child(second, minute_first);

        // Hours 20-23: 20:50, 23:09
        let first = self.add_root_child(TokenSet::digits(2..=2));
        let second = self.add_node(TokenSet::digits(0..=3));
        self.add_child(first, second);
        self.add_child(second, minute_first);

        // Hour 2 with minutes 40-59: 2:40, 2:53
        let second = self.add_node(TokenSet::digits(4..=5));
        self.add_child(first, second);
        self.add_child(second, minute_second);

        // Hours 3-9: 3:57, 8:12
        let first = self.add_root_child(TokenSet::digits(3..=9));
        self.add_child(first, minute_first);
    }

    fn build_12_hour(&mut self) {
        let seconds = self.config.seconds_enabled();
        let am_pm = self.add_node(TokenSet::am_pm());

        let seconds_first = self.add_node(TokenSet::digits(0..=5));
        let seconds_second = self.add_node(TokenSet::digits(0..=9));
        self.add_child(seconds_first, seconds_second);
        self.add_child(seconds_second, am_pm);

        // Hour 1, with quick entry of 1pm
        let first = self.add_root_child(TokenSet::digits(1..=1));
        self.add_child(first, am_pm);

        // Hours 10-12, with quick entry of 10am, 12pm
        let second = self.add_node(TokenSet::digits(0..=2));
        self.add_child(first, second);
        self.add_child(second, am_pm);

        // 1:02pm or the first minute digit of 10:49am
        let third = self.add_node(TokenSet::digits(0..=5));
        self.add_child(second, third);
        self.add_child(third, am_pm);

        if seconds {
            // A fourth digit of 0-5 is a minute digit of 10:mm:ss or the
            // first seconds digit of 1:mm:ss (1:00:00-1:25:59).
            let fourth = self.add_node(TokenSet::digits(0..=5));
            self.add_child(third, fourth);
            self.add_child(fourth, am_pm);
            let fifth = self.add_node(TokenSet::digits(0..=5));
            self.add_child(fourth, fifth);
            self.add_child(fifth, am_pm);
            self.add_child(fifth, seconds_second);
            let fifth = self.add_node(TokenSet::digits(6..=9));
            self.add_child(fourth, fifth);
            self.add_child(fifth, am_pm);

            // Minutes ending in 6-9 can only belong to 10-12 o'clock
            let fourth = self.add_node(TokenSet::digits(6..=9));
            self.add_child(third, fourth);
            self.add_child(fourth, am_pm);
            self.add_child(fourth, seconds_first);
        } else {
            // 10:49am, 12:40pm
            let fourth = self.add_node(TokenSet::digits(0..=9));
            self.add_child(third, fourth);
            self.add_child(fourth, am_pm);
        }

        // 1:06am-1:29pm
        let third = self.add_node(TokenSet::digits(6..=9));
        self.add_child(second, third);
        self.add_child(third, am_pm);
        if seconds {
            self.add_child(third, seconds_first);
        }

        // 1:30am-1:59pm
        let second = self.add_node(TokenSet::digits(3..=5));
        self.add_child(first, second);
        let third = self.add_node(TokenSet::digits(0..=9));
        self.add_child(second, third);
        self.add_child(third, am_pm);
        if seconds {
            self.add_child(third, seconds_first);
        }

        // Hours 2-9, with quick entry of 2am, 5pm
        let first = self.add_root_child(TokenSet::digits(2..=9));
        self.add_child(first, am_pm);
        let second = self.add_node(TokenSet::digits(0..=5));
        self.add_child(first, second);
        let third = self.add_node(TokenSet::digits(0..=9));
        self.add_child(second, third);
        self.add_child(third, am_pm);
        if seconds {
            self.add_child(third, seconds_first);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DigitGroup {
    value: u8,
    leading_zero: bool,
}

/// Pops up to two digits off the end of `rest`.
fn take_group(rest: &mut &[u8]) -> Option<DigitGroup> {
    let digits = *rest;
    match digits {
        [] => None,
        [units] => {
            *rest = &[];
            Some(DigitGroup {
                value: *units,
                leading_zero: false,
            })
        }
        [head @ .., tens, units] => {
            *rest = head;
            Some(DigitGroup {
                value: tens * 10 + units,
                leading_zero: *tens == 0,
            })
        }
    }
}

fn format_buffer(buffer: &[Token]) -> String {
    let keys: Vec<String> = buffer.iter().map(Token::to_string).collect();
    format!("[{}]", keys.join(", "))
}

// =============================================================================
// Decoded time
// =============================================================================

/// Whether the tens digit of a field was typed as an explicit zero.
///
/// Lets the display show "05" for a typed zero and "-5" for a missing digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnteredZeros {
    pub hour: bool,
    pub minute: bool,
    pub second: bool,
}

/// A typed buffer split into its fields. `None` means not typed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTime {
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub am_pm: Option<AmPm>,
    pub entered_zeros: EnteredZeros,
}

impl DecodedTime {
    /// The 24-hour timepoint, once the hour is known.
    ///
    /// Intended for fully legal buffers; untyped minutes and seconds count as
    /// zero and a 12-hour hour is converted with its AM/PM (12am is 00:xx).
    pub fn to_timepoint(&self) -> Option<Timepoint> {
        let hour = self.hour?;
        let hour = match self.am_pm {
            None => hour,
            Some(_) if !(1..=12).contains(&hour) => return None,
            Some(AmPm::Am) => hour % 12,
            Some(AmPm::Pm) => hour % 12 + 12,
        };
        Timepoint::new(hour, self.minute.unwrap_or(0), self.second.unwrap_or(0)).ok()
    }
}

// =============================================================================
// Typed time buffer
// =============================================================================

/// The keys typed so far, validated against a shared `LegalTimeTree`.
#[derive(Debug, Clone)]
pub struct TypedTime {
    tree: Arc<LegalTimeTree>,
    tokens: Vec<Token>,
}

impl TypedTime {
    pub fn new(tree: Arc<LegalTimeTree>) -> Self {
        Self {
            tree,
            tokens: Vec::new(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Appends `token` if the tree accepts it there. Returns whether it did.
    ///
    /// An entry completed early with AM/PM ("1pm", "10:30am" with seconds) is
    /// padded with zero digits before the AM/PM key so it reads as a full time.
    pub fn push(&mut self, token: Token) -> bool {
        if !self.tree.accepts(&self.tokens, token) {
            return false;
        }
        self.tokens.push(token);
        if token.is_am_pm() {
            self.pad_missing_fields();
        }
        true
    }

    /// Removes and returns the last token.
    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn is_fully_legal(&self) -> bool {
        self.tree.is_fully_legal(&self.tokens)
    }

    pub fn decode(&self) -> Result<DecodedTime, PickerError> {
        self.tree.decode(&self.tokens)
    }

    fn pad_missing_fields(&mut self) {
        let config = self.tree.config();
        let am_pm_at = self.tokens.len() - 1;
        let mut digits = am_pm_at;
        let mut pad = 0;
        if config.minutes_enabled() && digits <= 2 {
            pad += 2;
            digits += 2;
        }
        if config.seconds_enabled() && digits <= 4 {
            pad += 2;
        }
        for _ in 0..pad {
            self.tokens.insert(am_pm_at, Token::Digit(0));
        }
    }
}
