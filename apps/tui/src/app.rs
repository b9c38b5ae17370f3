use std::sync::Arc;

use anyhow::Result;
use chd_predictor::PredictorGateway;
use log::debug;

use crate::controller::{FormController, SubmitStatus};
use crate::model::{ActiveTab, AppState, Slot};

/// Represents actions that can be dispatched to the App.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Tick,
    CycleTab,
    SelectNext,
    SelectPrev,
    Activate,
    CycleValue { forward: bool },
    InputChar(char),
    Backspace,
    CommitInput,
    CancelInput,
    Submit,
    Reset,
    RequestClearHistory,
    ConfirmClear,
    CancelClear,
    ToggleHelp,
    Dismiss,
}

/// Which key map applies right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Normal,
    TextInput,
    ConfirmClear,
}

pub struct App {
    pub state: AppState,
    pub controller: FormController,
}

impl App {
    pub fn new(gateway: Arc<dyn PredictorGateway>) -> Self {
        Self {
            state: AppState::new(),
            controller: FormController::new(gateway),
        }
    }

    pub fn key_context(&self) -> KeyContext {
        if self.state.confirm_clear {
            KeyContext::ConfirmClear
        } else if self.state.input_mode {
            KeyContext::TextInput
        } else {
            KeyContext::Normal
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.state.quit(),
            Action::Tick => {
                self.state.ticks = self.state.ticks.wrapping_add(1);
                let before = self.controller.history().len();
                if self.controller.poll() {
                    // Newest record lands on top; keep the highlighted one.
                    if before > 0 && self.controller.history().len() > before {
                        self.state.selected_record += 1;
                    }
                    self.announce_outcome();
                }
            }
            Action::CycleTab => {
                self.state.active_tab = match self.state.active_tab {
                    ActiveTab::Form => ActiveTab::History,
                    ActiveTab::History => ActiveTab::Form,
                };
                self.state.input_mode = false;
                self.state.selected_record = 0;
            }
            Action::SelectNext => self.select(1),
            Action::SelectPrev => self.select(-1),
            Action::Activate => self.activate(),
            Action::CycleValue { forward } => {
                if let (ActiveTab::Form, Slot::Input(field)) =
                    (self.state.active_tab, self.state.current_slot())
                {
                    if field.is_toggle() {
                        self.controller.cycle(field, forward);
                    }
                }
            }
            Action::InputChar(ch) => self.state.input_buffer.push(ch),
            Action::Backspace => {
                self.state.input_buffer.pop();
            }
            Action::CommitInput => self.commit_input(),
            Action::CancelInput => {
                self.state.input_mode = false;
                self.state.input_buffer.clear();
            }
            Action::Submit => self.submit(),
            Action::Reset => {
                if self.controller.reset() {
                    self.state.input_mode = false;
                    self.state.input_buffer.clear();
                    self.state.status = Some("Form reset.".to_string());
                } else {
                    self.state.status = Some("Wait for the current prediction to finish.".to_string());
                }
            }
            Action::RequestClearHistory => {
                if self.state.active_tab == ActiveTab::History && !self.controller.history().is_empty() {
                    self.state.confirm_clear = true;
                }
            }
            Action::ConfirmClear => {
                self.controller.clear_history();
                self.state.confirm_clear = false;
                self.state.selected_record = 0;
                self.state.status = Some("History cleared.".to_string());
            }
            Action::CancelClear => self.state.confirm_clear = false,
            Action::ToggleHelp => self.state.show_help = !self.state.show_help,
            Action::Dismiss => {
                self.state.show_help = false;
                self.state.status = None;
            }
        }
        Ok(())
    }

    fn select(&mut self, step: isize) {
        let (index, len) = match self.state.active_tab {
            ActiveTab::Form => (&mut self.state.selected_slot, Slot::ALL.len()),
            ActiveTab::History => (&mut self.state.selected_record, self.controller.history().len()),
        };
        if len == 0 {
            *index = 0;
            return;
        }
        *index = (*index as isize + step).rem_euclid(len as isize) as usize;
    }

    fn activate(&mut self) {
        if self.state.active_tab != ActiveTab::Form {
            return;
        }
        let slot = self.state.current_slot();
        if let Slot::Input(field) = slot {
            if field.is_toggle() {
                self.controller.cycle(field, true);
                return;
            }
        }
        let form = &self.controller.snapshot().form;
        let current = match slot {
            Slot::Input(field) if !form.is_enabled(field) => {
                self.state.status =
                    Some(format!("{} only applies to current smokers.", field.label()));
                return;
            }
            Slot::Input(field) => form.raw(field).to_string(),
            Slot::Measure(m) => form.measurement(m).to_string(),
        };
        self.state.input_buffer = current;
        self.state.input_mode = true;
    }

    fn commit_input(&mut self) {
        let raw = std::mem::take(&mut self.state.input_buffer);
        match self.state.current_slot() {
            Slot::Input(field) => self.controller.edit(field, &raw),
            Slot::Measure(m) => self.controller.measure(m, &raw),
        }
        debug!("{} <- {:?}", self.state.current_slot().label(), raw.trim());
        self.state.input_mode = false;
    }

    fn submit(&mut self) {
        self.state.input_mode = false;
        self.state.status = Some(match self.controller.submit() {
            SubmitStatus::Started => format!("Asking the {} predictor...", self.controller.gateway_name()),
            SubmitStatus::Blocked => {
                let errors = &self.controller.snapshot().errors;
                format!("Fix {} field(s) before predicting.", errors.len())
            }
            SubmitStatus::AlreadyRunning => "A prediction is already running.".to_string(),
        });
    }

    fn announce_outcome(&mut self) {
        self.state.status = match &self.controller.snapshot().outcome {
            Some(Ok(result)) => Some(format!(
                "{} ({:.1}%)",
                result.classification.label(),
                result.probability * 100.0
            )),
            Some(Err(_)) => Some("Prediction failed.".to_string()),
            None => None,
        };
    }
}
