//! Per-button MIDI mapping model.

/// Highest zero-based MIDI channel.
pub const MAX_CHANNEL: u8 = 15;
/// Highest note or controller number.
pub const MAX_VALUE: u8 = 127;

/// Which MIDI message family a button produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonFunction {
    #[default]
    Note,
    ControlChange,
}

/// Mapping of a single physical button.
///
/// Fields are only reachable through mutators that clamp channel to 0-15
/// and value to 0-127, so a `ButtonConfig` is always encodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonConfig {
    function: ButtonFunction,
    channel: u8,
    value: u8,
}

impl ButtonConfig {
    pub fn new(function: ButtonFunction, channel: u8, value: u8) -> Self {
        let mut config = Self {
            function,
            ..Self::default()
        };
        config.set_channel(channel);
        config.set_value(value);
        config
    }

    /// Note mapping on the given channel
    pub fn note(channel: u8, note: u8) -> Self {
        Self::new(ButtonFunction::Note, channel, note)
    }

    /// Control change mapping on the given channel
    pub fn control_change(channel: u8, controller: u8) -> Self {
        Self::new(ButtonFunction::ControlChange, channel, controller)
    }

    pub fn function(&self) -> ButtonFunction {
        self.function
    }

    /// Zero-based MIDI channel (0-15)
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Note number for `Note`, controller number for `ControlChange`
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn set_function(&mut self, function: ButtonFunction) {
        self.function = function;
    }

    pub fn set_channel(&mut self, channel: u8) {
        self.channel = channel.min(MAX_CHANNEL);
    }

    pub fn set_value(&mut self, value: u8) {
        self.value = value.min(MAX_VALUE);
    }
}

/// One `ButtonConfig` per button of the attached controller.
///
/// Only the lifecycle manager can resize the store, so its length always
/// matches the active controller's button count (or zero without one).
/// Entries themselves are freely editable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerConfigStore {
    buttons: Vec<ButtonConfig>,
}

impl ControllerConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry with `button_count` default mappings.
    pub(crate) fn reset(&mut self, button_count: usize) {
        self.buttons.clear();
        self.buttons.resize(button_count, ButtonConfig::default());
    }

    pub(crate) fn clear(&mut self) {
        self.buttons.clear();
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn get(&self, button: usize) -> Option<&ButtonConfig> {
        self.buttons.get(button)
    }

    pub fn get_mut(&mut self, button: usize) -> Option<&mut ButtonConfig> {
        self.buttons.get_mut(button)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ButtonConfig> {
        self.buttons.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ButtonConfig> {
        self.buttons.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_note_zero_on_first_channel() {
        let config = ButtonConfig::default();
        assert_eq!(config.function(), ButtonFunction::Note);
        assert_eq!(config.channel(), 0);
        assert_eq!(config.value(), 0);
    }

    #[test]
    fn mutators_clamp_to_midi_ranges() {
        let mut config = ButtonConfig::default();
        config.set_channel(16);
        config.set_value(200);
        assert_eq!(config.channel(), 15);
        assert_eq!(config.value(), 127);

        config.set_channel(9);
        config.set_value(64);
        assert_eq!(config.channel(), 9);
        assert_eq!(config.value(), 64);
    }

    #[test]
    fn constructors_clamp_too() {
        let config = ButtonConfig::control_change(255, 128);
        assert_eq!(config.function(), ButtonFunction::ControlChange);
        assert_eq!(config.channel(), 15);
        assert_eq!(config.value(), 127);
    }

    #[test]
    fn reset_discards_previous_entries() {
        let mut store = ControllerConfigStore::new();
        store.reset(3);
        *store.get_mut(1).unwrap() = ButtonConfig::note(2, 60);

        store.reset(5);
        assert_eq!(store.len(), 5);
        assert!(store.iter().all(|c| *c == ButtonConfig::default()));

        store.clear();
        assert!(store.is_empty());
        assert!(store.get(0).is_none());
    }
}
