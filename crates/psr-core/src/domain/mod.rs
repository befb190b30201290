pub mod errors;

pub use errors::{PsrError, PsrErrorCategory, PsrResult};

use std::fmt::{Display, Formatter};

/// Axis labels a point-source response histogram may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseAxis {
    /// Real (true) photon energy. Always present.
    PhotonEnergy,
    MeasuredEnergy,
    /// Compton scattering angle.
    Phi,
    /// Location in the Compton data space (HEALPix pixel).
    PsiChi,
    /// Electron recoil direction (HEALPix pixel).
    SigmaTau,
    /// Distance from the first interaction.
    Distance,
}

impl ResponseAxis {
    pub const ALL: [Self; 6] = [
        Self::PhotonEnergy,
        Self::MeasuredEnergy,
        Self::Phi,
        Self::PsiChi,
        Self::SigmaTau,
        Self::Distance,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PhotonEnergy => "Ei",
            Self::MeasuredEnergy => "Em",
            Self::Phi => "Phi",
            Self::PsiChi => "PsiChi",
            Self::SigmaTau => "SigmaTau",
            Self::Distance => "Dist",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|axis| axis.as_str() == label)
    }

    pub const fn is_required(self) -> bool {
        matches!(self, Self::PhotonEnergy)
    }
}

impl Display for ResponseAxis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
