/// Which of the two status elements are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub indicator: bool,
    pub banner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Submitted,
    Succeeded,
    Failed(String),
}

impl UiState {
    /// Pure transition function. Entering `Loading` always drops a previous error,
    /// and both terminal events leave `Loading` no matter what state they arrive in.
    pub fn transition(self, event: UiEvent) -> UiState {
        match event {
            UiEvent::Submitted => UiState::Loading,
            UiEvent::Succeeded => UiState::Idle,
            UiEvent::Failed(message) => UiState::Error(message),
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            UiState::Idle => Visibility {
                indicator: false,
                banner: false,
            },
            UiState::Loading => Visibility {
                indicator: true,
                banner: false,
            },
            UiState::Error(_) => Visibility {
                indicator: false,
                banner: true,
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_clears_previous_error() {
        let state = UiState::Error("Invalid URL".to_string()).transition(UiEvent::Submitted);
        assert_eq!(state, UiState::Loading);
        assert_eq!(
            state.visibility(),
            Visibility {
                indicator: true,
                banner: false
            }
        );
    }

    #[test]
    fn test_loading_is_always_exited() {
        let done = UiState::Loading.transition(UiEvent::Succeeded);
        assert_eq!(done, UiState::Idle);
        assert!(!done.visibility().indicator);

        let failed = UiState::Loading.transition(UiEvent::Failed("boom".to_string()));
        assert_eq!(failed.error_message(), Some("boom"));
        assert!(!failed.visibility().indicator);
        assert!(failed.visibility().banner);
    }

    #[test]
    fn test_indicator_and_banner_never_both_visible() {
        for state in [
            UiState::Idle,
            UiState::Loading,
            UiState::Error("x".to_string()),
        ] {
            let v = state.visibility();
            assert!(!(v.indicator && v.banner), "{state:?}");
        }
    }

    #[test]
    fn test_state_is_reusable_after_completion() {
        let state = UiState::default()
            .transition(UiEvent::Submitted)
            .transition(UiEvent::Failed("first".to_string()))
            .transition(UiEvent::Submitted)
            .transition(UiEvent::Succeeded);
        assert_eq!(state, UiState::Idle);
    }
}
