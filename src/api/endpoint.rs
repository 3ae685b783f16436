use clap::ValueEnum;
use std::fmt;

/// Default root of the Hub'Eau v2 APIs.
pub const DEFAULT_BASE_URL: &str = "https://hubeau.eaufrance.fr/api/v2";

/// The two Hub'Eau APIs this crate speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Api {
    #[value(name = "qualite_rivieres")]
    QualiteRivieres,
    #[value(name = "hydrometrie")]
    Hydrometrie,
}

impl Api {
    pub fn path(self) -> &'static str {
        match self {
            Api::QualiteRivieres => "qualite_rivieres",
            Api::Hydrometrie => "hydrometrie",
        }
    }

    pub fn endpoints(self) -> &'static [Endpoint] {
        match self {
            Api::QualiteRivieres => &[
                Endpoint::StationPc,
                Endpoint::AnalysePc,
                Endpoint::OperationPc,
                Endpoint::ConditionEnvironnementalePc,
            ],
            Api::Hydrometrie => &[
                Endpoint::Sites,
                Endpoint::Stations,
                Endpoint::ObservationsTr,
                Endpoint::ObsElab,
            ],
        }
    }
}

/// Every resource the client can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Endpoint {
    #[value(name = "station_pc")]
    StationPc,
    #[value(name = "analyse_pc")]
    AnalysePc,
    #[value(name = "operation_pc")]
    OperationPc,
    #[value(name = "condition_environnementale_pc")]
    ConditionEnvironnementalePc,
    #[value(name = "referentiel/sites")]
    Sites,
    #[value(name = "referentiel/stations")]
    Stations,
    #[value(name = "observations_tr")]
    ObservationsTr,
    #[value(name = "obs_elab")]
    ObsElab,
}

impl Endpoint {
    pub fn api(self) -> Api {
        match self {
            Endpoint::StationPc
            | Endpoint::AnalysePc
            | Endpoint::OperationPc
            | Endpoint::ConditionEnvironnementalePc => Api::QualiteRivieres,
            Endpoint::Sites | Endpoint::Stations | Endpoint::ObservationsTr | Endpoint::ObsElab => {
                Api::Hydrometrie
            }
        }
    }

    /// Path below the API root, e.g. `referentiel/sites`.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::StationPc => "station_pc",
            Endpoint::AnalysePc => "analyse_pc",
            Endpoint::OperationPc => "operation_pc",
            Endpoint::ConditionEnvironnementalePc => "condition_environnementale_pc",
            Endpoint::Sites => "referentiel/sites",
            Endpoint::Stations => "referentiel/stations",
            Endpoint::ObservationsTr => "observations_tr",
            Endpoint::ObsElab => "obs_elab",
        }
    }

    /// Full URL below `base_url`.
    pub fn url(self, base_url: &str) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.api().path(),
            self.name()
        )
    }

    /// Name usable in file names (`/` replaced by `_`).
    pub fn file_stem(self) -> String {
        self.name().replace('/', "_")
    }

    /// Page size small enough for endpoints that time out on large samples.
    pub fn sample_size(self) -> usize {
        match self {
            Endpoint::OperationPc => 2,
            _ => 10,
        }
    }

    pub fn all() -> impl Iterator<Item = Endpoint> {
        Api::QualiteRivieres
            .endpoints()
            .iter()
            .chain(Api::Hydrometrie.endpoints())
            .copied()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
