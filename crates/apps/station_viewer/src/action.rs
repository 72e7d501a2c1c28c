use std::str::FromStr;

use layers::Category;

/// One operator request against the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperatorAction {
    Show(Category),
    /// Clears the category's range circles, then hides its markers.
    Hide(Category),
    DrawCircles(Category),
    PlayRoute(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionParseError(pub String);

impl std::fmt::Display for ActionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid action {:?} (expected show:<cat>, hide:<cat>, circles:<cat> or route:<index>)",
            self.0
        )
    }
}

impl std::error::Error for ActionParseError {}

impl FromStr for OperatorAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ActionParseError(s.to_string());
        let (verb, arg) = s.split_once(':').ok_or_else(err)?;
        let category = || arg.parse::<Category>().map_err(|_| err());
        match verb {
            "show" => Ok(OperatorAction::Show(category()?)),
            "hide" => Ok(OperatorAction::Hide(category()?)),
            "circles" => Ok(OperatorAction::DrawCircles(category()?)),
            "route" => arg
                .parse::<usize>()
                .map(OperatorAction::PlayRoute)
                .map_err(|_| err()),
            _ => Err(err()),
        }
    }
}

impl std::fmt::Display for OperatorAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorAction::Show(c) => write!(f, "show:{c}"),
            OperatorAction::Hide(c) => write!(f, "hide:{c}"),
            OperatorAction::DrawCircles(c) => write!(f, "circles:{c}"),
            OperatorAction::PlayRoute(i) => write!(f, "route:{i}"),
        }
    }
}
