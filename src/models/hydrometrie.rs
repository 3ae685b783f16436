//! Records of the `hydrometrie` API (water levels and flows).

use super::{Code, Geometry, impl_record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A hydrometric site (`referentiel/sites`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub code_site: Option<String>,
    pub libelle_site: Option<String>,
    pub altitude_site: Option<f64>,
    pub code_commune_site: Option<String>,
    pub code_cours_eau: Option<String>,
    pub code_departement: Option<String>,
    pub code_entite_hydro_site: Option<String>,
    pub code_projection: Option<Code>,
    pub code_region: Option<String>,
    pub code_systeme_alti_site: Option<Code>,
    pub code_troncon_hydro_site: Option<String>,
    pub code_zone_hydro_site: Option<String>,
    pub commentaire_influence_generale_site: Option<String>,
    pub commentaire_site: Option<String>,
    pub coordonnee_x_site: Option<f64>,
    pub coordonnee_y_site: Option<f64>,
    pub date_maj_site: Option<String>,
    pub date_premiere_donnee_dispo_site: Option<String>,
    pub geometry: Option<Geometry>,
    pub grandeur_hydro: Option<String>,
    pub influence_generale_site: Option<Code>,
    pub latitude_site: Option<f64>,
    pub libelle_commune: Option<String>,
    pub libelle_cours_eau: Option<String>,
    pub libelle_departement: Option<String>,
    pub libelle_region: Option<String>,
    pub longitude_site: Option<f64>,
    pub premier_mois_annee_hydro_site: Option<Code>,
    pub premier_mois_etiage_site: Option<Code>,
    pub statut_site: Option<Code>,
    pub surface_bv: Option<f64>,
    pub type_contexte_loi_stat_site: Option<Code>,
    pub type_loi_site: Option<Code>,
    pub type_site: Option<String>,
    pub uri_cours_eau: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A hydrometric station (`referentiel/stations`).
///
/// Unlike the other records, the referential guarantees most station fields,
/// so they are required at decode time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub altitude_ref_alti_station: Option<f64>,
    pub code_commune_station: String,
    pub code_cours_eau: String,
    pub code_departement: String,
    pub code_finalite_station: Option<String>,
    pub code_projection: i64,
    pub code_regime_station: i64,
    pub code_region: String,
    pub code_sandre_reseau_station: Option<Vec<Value>>,
    pub code_site: String,
    pub code_station: String,
    pub code_systeme_alti_site: Option<i64>,
    pub commentaire_influence_locale_station: Option<String>,
    pub commentaire_station: Option<String>,
    pub coordonnee_x_station: f64,
    pub coordonnee_y_station: f64,
    pub date_activation_ref_alti_station: Option<String>,
    pub date_debut_ref_alti_station: Option<String>,
    pub date_fermeture_station: Option<String>,
    pub date_maj_ref_alti_station: Option<String>,
    pub date_maj_station: String,
    pub date_ouverture_station: String,
    pub descriptif_station: Option<String>,
    pub en_service: bool,
    pub geometry: Option<Geometry>,
    pub influence_locale_station: Option<i64>,
    pub latitude_station: f64,
    pub libelle_commune: String,
    pub libelle_cours_eau: Option<String>,
    pub libelle_departement: String,
    pub libelle_region: String,
    pub libelle_site: String,
    pub libelle_station: String,
    pub longitude_station: f64,
    pub qualification_donnees_station: i64,
    pub type_contexte_loi_stat_station: Option<Code>,
    pub type_loi_station: Option<Code>,
    pub type_station: String,
    pub uri_cours_eau: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A real-time observation (`observations_tr`). `grandeur_hydro` is `H` or `Q`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationTr {
    pub code_continuite: Option<Code>,
    pub code_methode_obs: Option<Code>,
    pub code_qualification_obs: Option<Code>,
    pub code_site: Option<String>,
    pub code_station: Option<String>,
    pub code_statut: Option<Code>,
    pub code_systeme_alti_serie: Option<Code>,
    pub date_debut_serie: Option<String>,
    pub date_fin_serie: Option<String>,
    pub date_obs: Option<String>,
    pub grandeur_hydro: Option<String>,
    pub latitude: Option<f64>,
    pub libelle_continuite: Option<String>,
    pub libelle_methode_obs: Option<String>,
    pub libelle_qualification_obs: Option<String>,
    pub libelle_statut: Option<String>,
    pub longitude: Option<f64>,
    pub resultat_obs: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An elaborated observation (`obs_elab`), e.g. daily or monthly mean flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObsElab {
    pub code_methode: Option<Code>,
    pub code_qualification: Option<Code>,
    pub code_site: Option<String>,
    pub code_station: Option<String>,
    pub code_statut: Option<Code>,
    pub date_obs_elab: Option<String>,
    pub date_prod: Option<String>,
    pub grandeur_hydro_elab: Option<String>,
    pub latitude: Option<f64>,
    pub libelle_methode: Option<String>,
    pub libelle_qualification: Option<String>,
    pub libelle_statut: Option<String>,
    pub longitude: Option<f64>,
    pub resultat_obs_elab: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_record!(Site, Station, ObservationTr, ObsElab);
