//! Menu controller
//!
//! Browsing: Up/Down move between siblings, Right opens a submenu or starts
//! editing a leaf, Left goes back up. While editing a setting Up/Down change
//! a working copy, Right saves it and Left throws it away. Editing one of
//! the action leaves raises its operator flag for as long as the edit lasts.

use core::fmt::Write;

use heapless::String;

use crate::config::{load_or_init, save_config, ConfigStore, Param, SharedConfig};
use crate::flags::{Flag, SharedFlags};

use super::buttons::{Button, MenuInput, PRESS_COUNT_MAX};
use super::tree::MenuItem;

/// Press count above which edits move by 10
const PRESS_COUNT_TENS: u8 = 10;

/// Item decoration, as drawn in the first column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Marker {
    /// `+` opens a submenu
    Submenu,
    /// `>` can be edited
    Editable,
    /// `<` being edited
    Editing,
}

impl Marker {
    pub const fn symbol(self) -> char {
        match self {
            Marker::Submenu => '+',
            Marker::Editable => '>',
            Marker::Editing => '<',
        }
    }
}

/// Characters per line of the 16x2 character display
pub const LINE_WIDTH: usize = 16;

pub type Line = String<LINE_WIDTH>;

/// What a renderer needs to draw the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuView {
    pub label: &'static str,
    pub marker: Marker,
    /// Setting value, live while editing
    pub value: Option<u32>,
    /// Left goes back to a parent
    pub has_parent: bool,
}

impl MenuView {
    /// Lay the view out on two display lines, truncating long text
    pub fn render(&self) -> [Line; 2] {
        let mut top = Line::new();
        let mut bottom = Line::new();
        let _ = top.push(self.marker.symbol());
        for c in self.label.chars() {
            if top.push(c).is_err() {
                break;
            }
        }
        if let Some(value) = self.value {
            let _ = write!(bottom, "{}", value);
        } else if self.has_parent {
            let _ = bottom.push_str("<- back");
        }
        [top, bottom]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Setting { param: Param, value: u32 },
    Action,
}

pub struct Menu<'a, S> {
    current: MenuItem,
    edit: Option<Edit>,
    flags: &'a SharedFlags,
    config: &'a SharedConfig,
    store: S,
}

impl<'a, S: ConfigStore> Menu<'a, S> {
    pub fn new(flags: &'a SharedFlags, config: &'a SharedConfig, store: S) -> Self {
        Self {
            current: MenuItem::ROOT,
            edit: None,
            flags,
            config,
            store,
        }
    }

    pub fn current(&self) -> MenuItem {
        self.current
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> MenuView {
        let value = match (self.edit, self.current) {
            (Some(Edit::Setting { value, .. }), _) => Some(value),
            (_, MenuItem::Setting(param)) => Some(param.get(&self.config.get())),
            _ => None,
        };
        let marker = if self.edit.is_some() {
            Marker::Editing
        } else if self.current.is_editable() {
            Marker::Editable
        } else {
            Marker::Submenu
        };
        MenuView {
            label: self.current.label(),
            marker,
            value,
            has_parent: self.current.parent().is_some(),
        }
    }

    fn action_flag(&self, item: MenuItem) -> Option<&'a Flag> {
        let flags = self.flags;
        match item {
            MenuItem::StartTimelapse => Some(&flags.start_timelapse),
            MenuItem::InitRight => Some(&flags.init_right),
            MenuItem::InitLeft => Some(&flags.init_left),
            _ => None,
        }
    }

    fn begin_edit(&mut self) {
        self.edit = match self.current {
            MenuItem::Setting(param) => Some(Edit::Setting {
                param,
                value: param.get(&self.config.get()),
            }),
            item => {
                if let Some(flag) = self.action_flag(item) {
                    flag.set();
                    log_info!("{} requested", item.label());
                }
                Some(Edit::Action)
            }
        };
    }

    fn end_edit(&mut self, commit: bool) {
        match self.edit.take() {
            Some(Edit::Setting { param, value }) if commit => {
                let mut config = self.config.get();
                param.set(&mut config, value);
                self.config.set(config);
                if let Err(e) = save_config(&mut self.store, &config) {
                    log_error!("saving {} failed: {:?}", param.label(), e);
                }
            }
            Some(Edit::Action) => {
                if let Some(flag) = self.action_flag(self.current) {
                    flag.clear();
                }
            }
            _ => {}
        }
    }

    fn adjust(&mut self, up: bool, press_count: u8) {
        let delta = if press_count > PRESS_COUNT_MAX {
            100
        } else if press_count > PRESS_COUNT_TENS {
            10
        } else {
            1
        };

        let flag = self.action_flag(self.current);
        match &mut self.edit {
            Some(Edit::Setting { param, value }) => {
                let raw = if up {
                    value.saturating_add(delta)
                } else {
                    value.saturating_sub(delta)
                };
                *value = param.limits().clamp(raw);
            }
            Some(Edit::Action) => {
                // Holding the action re-asserts its flag
                if let Some(flag) = flag {
                    flag.set();
                }
            }
            None => {}
        }
    }
}

impl<S: ConfigStore> MenuInput for Menu<'_, S> {
    fn start(&mut self) {
        let config = load_or_init(&mut self.store);
        self.config.set(config);
        self.current = MenuItem::ROOT;
        self.edit = None;
    }

    fn on_button(&mut self, button: Button, press_count: u8) {
        let editing = self.edit.is_some();
        match button {
            Button::Right if editing => self.end_edit(true),
            Button::Right => match self.current.first_child() {
                Some(child) => self.current = child,
                None => self.begin_edit(),
            },
            Button::Left if editing => self.end_edit(false),
            Button::Left => {
                if let Some(parent) = self.current.parent() {
                    self.current = parent;
                }
            }
            Button::Up if editing => self.adjust(true, press_count),
            Button::Up => self.current = self.current.prev(),
            Button::Down if editing => self.adjust(false, press_count),
            Button::Down => self.current = self.current.next(),
            Button::Select => {
                if !editing {
                    log_debug!("menu at {}", self.current.label());
                }
            }
        }
    }
}
