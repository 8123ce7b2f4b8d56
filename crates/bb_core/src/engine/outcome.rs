//! Outcome and pitch codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Terminal result of a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroOutcome {
    So,
    Bb,
    Hp,
    Ih,
    Sl,
    Dl,
    Tl,
    Hr,
    Go,
    /// Groundout turned into a double play.
    Dp,
    /// Groundout where the defense retired a runner instead of the batter.
    Fc,
    Fo,
    Lo,
    Po,
}

/// Events during an at-bat that do not end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MicroEvent {
    /// Wild pitch.
    Wp,
    /// Passed ball.
    Pb,
    /// Balk.
    Bk,
    /// Stolen-base attempt.
    Sb,
    /// Pickoff attempt at first.
    Pk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeCode {
    Macro(MacroOutcome),
    Micro(MicroEvent),
}

impl MacroOutcome {
    pub const BASE: [MacroOutcome; 4] = [
        MacroOutcome::So,
        MacroOutcome::Bb,
        MacroOutcome::Hp,
        MacroOutcome::Hr,
    ];
    pub const HITS: [MacroOutcome; 4] = [
        MacroOutcome::Ih,
        MacroOutcome::Sl,
        MacroOutcome::Dl,
        MacroOutcome::Tl,
    ];
    pub const OUTS: [MacroOutcome; 4] = [
        MacroOutcome::Go,
        MacroOutcome::Fo,
        MacroOutcome::Lo,
        MacroOutcome::Po,
    ];
    pub const ALL: [MacroOutcome; 14] = [
        MacroOutcome::So,
        MacroOutcome::Bb,
        MacroOutcome::Hp,
        MacroOutcome::Ih,
        MacroOutcome::Sl,
        MacroOutcome::Dl,
        MacroOutcome::Tl,
        MacroOutcome::Hr,
        MacroOutcome::Go,
        MacroOutcome::Dp,
        MacroOutcome::Fc,
        MacroOutcome::Fo,
        MacroOutcome::Lo,
        MacroOutcome::Po,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MacroOutcome::So => "SO",
            MacroOutcome::Bb => "BB",
            MacroOutcome::Hp => "HP",
            MacroOutcome::Ih => "IH",
            MacroOutcome::Sl => "SL",
            MacroOutcome::Dl => "DL",
            MacroOutcome::Tl => "TL",
            MacroOutcome::Hr => "HR",
            MacroOutcome::Go => "GO",
            MacroOutcome::Dp => "DP",
            MacroOutcome::Fc => "FC",
            MacroOutcome::Fo => "FO",
            MacroOutcome::Lo => "LO",
            MacroOutcome::Po => "PO",
        }
    }

    pub fn is_hit(self) -> bool {
        matches!(
            self,
            MacroOutcome::Ih
                | MacroOutcome::Sl
                | MacroOutcome::Dl
                | MacroOutcome::Tl
                | MacroOutcome::Hr
        )
    }

    pub fn is_ball_in_play(self) -> bool {
        !matches!(
            self,
            MacroOutcome::So | MacroOutcome::Bb | MacroOutcome::Hp | MacroOutcome::Hr
        )
    }

    /// Outcomes that resolve via the contested-out tables.
    pub fn is_contested_out(self) -> bool {
        matches!(
            self,
            MacroOutcome::So
                | MacroOutcome::Go
                | MacroOutcome::Dp
                | MacroOutcome::Fc
                | MacroOutcome::Fo
                | MacroOutcome::Lo
                | MacroOutcome::Po
        )
    }
}

impl MicroEvent {
    pub const ALL: [MicroEvent; 5] = [
        MicroEvent::Wp,
        MicroEvent::Pb,
        MicroEvent::Bk,
        MicroEvent::Sb,
        MicroEvent::Pk,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MicroEvent::Wp => "WP",
            MicroEvent::Pb => "PB",
            MicroEvent::Bk => "BK",
            MicroEvent::Sb => "SB",
            MicroEvent::Pk => "PK",
        }
    }
}

impl OutcomeCode {
    pub fn code(self) -> &'static str {
        match self {
            OutcomeCode::Macro(m) => m.code(),
            OutcomeCode::Micro(m) => m.code(),
        }
    }

    pub fn is_macro(self) -> bool {
        matches!(self, OutcomeCode::Macro(_))
    }
}

impl From<MacroOutcome> for OutcomeCode {
    fn from(m: MacroOutcome) -> Self {
        OutcomeCode::Macro(m)
    }
}

impl From<MicroEvent> for OutcomeCode {
    fn from(m: MicroEvent) -> Self {
        OutcomeCode::Micro(m)
    }
}

impl fmt::Display for MacroOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for MicroEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OutcomeCode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_uppercase();
        if let Some(m) = MacroOutcome::ALL.iter().find(|m| m.code() == code) {
            return Ok(OutcomeCode::Macro(*m));
        }
        if let Some(m) = MicroEvent::ALL.iter().find(|m| m.code() == code) {
            return Ok(OutcomeCode::Micro(*m));
        }
        Err(SimError::UnknownOutcome(s.to_string()))
    }
}

/// Single pitch in a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchCode {
    /// Ball.
    B,
    /// Called strike.
    C,
    /// Swinging strike.
    S,
    /// Foul.
    F,
    /// Ball put in play.
    X,
    /// Hit by pitch.
    H,
}

impl PitchCode {
    pub fn as_char(self) -> char {
        match self {
            PitchCode::B => 'B',
            PitchCode::C => 'C',
            PitchCode::S => 'S',
            PitchCode::F => 'F',
            PitchCode::X => 'X',
            PitchCode::H => 'H',
        }
    }

    pub fn is_strike(self) -> bool {
        matches!(self, PitchCode::C | PitchCode::S | PitchCode::F)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_code() {
        for m in MacroOutcome::ALL {
            assert_eq!(m.code().parse::<OutcomeCode>().unwrap(), OutcomeCode::Macro(m));
        }
        for m in MicroEvent::ALL {
            assert_eq!(m.code().parse::<OutcomeCode>().unwrap(), OutcomeCode::Micro(m));
        }
    }

    #[test]
    fn test_unknown_code_is_configuration_error() {
        let err = "QQ".parse::<OutcomeCode>().unwrap_err();
        assert_eq!(err, SimError::UnknownOutcome("QQ".into()));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_families() {
        assert!(MacroOutcome::Hr.is_hit());
        assert!(!MacroOutcome::Hr.is_ball_in_play());
        assert!(MacroOutcome::Fc.is_contested_out());
        assert!(!MacroOutcome::Bb.is_contested_out());
    }
}
