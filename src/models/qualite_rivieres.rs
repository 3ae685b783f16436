//! Records of the `qualite_rivieres` API (physico-chemical river quality).

use super::{Code, Geometry, ResultValue, impl_record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A river-quality monitoring station (`station_pc`).
///
/// `code_station` is optional on the wire but is the only usable fetch key
/// for the station's analyses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationPc {
    pub code_station: Option<String>,
    pub libelle_station: Option<String>,
    pub uri_station: Option<String>,
    pub durete: Option<f64>,
    pub coordonnee_x: Option<f64>,
    pub coordonnee_y: Option<f64>,
    pub code_projection: Option<String>,
    pub libelle_projection: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub code_commune: Option<String>,
    pub libelle_commune: Option<String>,
    pub code_departement: Option<String>,
    pub libelle_departement: Option<String>,
    pub code_region: Option<String>,
    pub libelle_region: Option<String>,
    pub code_cours_eau: Option<String>,
    pub nom_cours_eau: Option<String>,
    pub uri_cours_eau: Option<String>,
    pub nom_masse_deau: Option<String>,
    pub code_masse_deau: Option<String>,
    pub code_eu_masse_deau: Option<String>,
    pub uri_masse_deau: Option<String>,
    pub code_eu_sous_bassin: Option<String>,
    pub nom_sous_bassin: Option<String>,
    pub uri_sous_bassin: Option<String>,
    pub code_bassin: Option<String>,
    pub code_eu_bassin: Option<String>,
    pub nom_bassin: Option<String>,
    pub uri_bassin: Option<String>,
    pub type_entite_hydro: Option<String>,
    pub commentaire: Option<String>,
    pub date_creation: Option<String>,
    pub date_arret: Option<String>,
    pub date_maj_information: Option<String>,
    pub finalite: Option<String>,
    pub localisation_precise: Option<String>,
    pub nature: Option<String>,
    pub altitude_point_caracteristique: Option<f64>,
    pub point_kilometrique: Option<f64>,
    pub premier_mois_annee_etiage: Option<Code>,
    pub superficie_bassin_versant_reel: Option<f64>,
    pub superficie_bassin_versant_topo: Option<f64>,
    pub geometry: Option<Geometry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StationPc {
    /// Label used in logs: the code, or `"unknown"`.
    pub fn display_code(&self) -> &str {
        self.code_station.as_deref().unwrap_or("unknown")
    }
}

/// One physico-chemical analysis (`analyse_pc`).
///
/// `code_station` refers to a [`StationPc`] without any integrity check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysePc {
    pub code_station: Option<String>,
    pub libelle_station: Option<String>,
    pub uri_station: Option<String>,
    pub code_support: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub libelle_support: Option<String>,
    pub uri_support: Option<String>,
    pub code_fraction: Option<String>,
    pub libelle_fraction: Option<String>,
    pub uri_fraction: Option<String>,
    /// `YYYY-MM-DD`
    pub date_prelevement: Option<String>,
    pub heure_prelevement: Option<String>,
    pub date_maj_analyse: Option<String>,
    pub heure_analyse: Option<String>,
    pub code_parametre: Option<String>,
    pub libelle_parametre: Option<String>,
    pub uri_parametre: Option<String>,
    pub code_groupe_parametre: Option<Vec<String>>,
    pub libelle_groupe_parametre: Option<Vec<String>>,
    pub uri_groupe_parametre: Option<Vec<String>>,
    pub resultat: Option<ResultValue>,
    pub code_unite: Option<String>,
    pub symbole_unite: Option<String>,
    pub uri_unite: Option<String>,
    pub code_remarque: Option<String>,
    pub mnemo_remarque: Option<String>,
    pub code_insitu: Option<String>,
    pub libelle_insitu: Option<String>,
    pub code_difficulte_analyse: Option<String>,
    pub mnemo_difficulte_analyse: Option<String>,
    pub limite_detection: Option<f64>,
    pub limite_quantification: Option<f64>,
    pub limite_saturation: Option<f64>,
    pub incertitude_analytique: Option<f64>,
    pub code_methode_fractionnement: Option<String>,
    pub nom_methode_fractionnement: Option<String>,
    pub uri_methode_fractionnement: Option<String>,
    pub code_methode_analyse: Option<String>,
    pub nom_methode_analyse: Option<String>,
    pub uri_methode_analyse: Option<String>,
    pub rendement_extraction: Option<f64>,
    pub code_methode_extraction: Option<String>,
    pub nom_methode_extraction: Option<String>,
    pub uri_methode_extraction: Option<String>,
    pub code_accreditation: Option<String>,
    pub mnemo_accreditation: Option<String>,
    pub agrement: Option<String>,
    pub code_statut: Option<String>,
    pub mnemo_statut: Option<String>,
    pub code_qualification: Option<String>,
    pub libelle_qualification: Option<String>,
    pub commentaires_analyse: Option<String>,
    pub commentaires_resultat_analyse: Option<String>,
    pub code_reseau: Option<Vec<String>>,
    pub nom_reseau: Option<Vec<String>>,
    pub uri_reseau: Option<Vec<String>>,
    pub code_producteur_analyse: Option<String>,
    pub nom_producteur_analyse: Option<String>,
    pub uri_producteur_prelevement: Option<String>,
    pub code_preleveur: Option<String>,
    pub nom_preleveur: Option<String>,
    pub uri_preleveur: Option<String>,
    pub code_laboratoire: Option<String>,
    pub nom_laboratoire: Option<String>,
    pub uri_laboratoire: Option<String>,
    pub code_operation: Option<String>,
    pub code_prelevement: Option<String>,
    pub code_point_eau_surface: Option<String>,
    pub code_analyse: Option<String>,
    pub code_banque_reference: Option<String>,
    pub geometry: Option<Geometry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A sampling operation (`operation_pc`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationPc {
    pub code_station: Option<String>,
    pub libelle_station: Option<String>,
    pub uri_station: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub x_prelevement: Option<f64>,
    pub y_prelevement: Option<f64>,
    pub code_projection: Option<String>,
    pub libelle_projection: Option<String>,
    pub code_support: Option<String>,
    pub libelle_support: Option<String>,
    pub uri_support: Option<String>,
    pub code_methode: Option<String>,
    pub nom_methode: Option<String>,
    pub uri_methode: Option<String>,
    pub date_prelevement: Option<String>,
    pub date_fin: Option<String>,
    pub heure_fin: Option<String>,
    pub heure_prelevement: Option<String>,
    pub code_zone_verticale_prospectee: Option<String>,
    pub mnemo_zone_verticale_prospectee: Option<String>,
    pub profondeur: Option<f64>,
    pub code_difficulte: Option<String>,
    pub mnemo_difficulte: Option<String>,
    pub code_accreditation: Option<String>,
    pub mnemo_accreditation: Option<String>,
    pub agrement: Option<String>,
    pub code_finalite: Option<String>,
    pub libelle_finalite: Option<String>,
    pub commentaires: Option<String>,
    pub code_reseau: Option<Vec<String>>,
    pub nom_reseau: Option<Vec<String>>,
    pub uri_reseau: Option<Vec<String>>,
    pub code_producteur: Option<String>,
    pub nom_producteur: Option<String>,
    pub uri_producteur: Option<String>,
    pub code_preleveur: Option<String>,
    pub nom_preleveur: Option<String>,
    pub uri_preleveur: Option<String>,
    pub code_operation: Option<String>,
    pub code_prelevement: Option<String>,
    pub code_point_eau_surface: Option<String>,
    pub code_banque_reference: Option<String>,
    pub geometry: Option<Geometry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Environmental conditions recorded during a sampling (`condition_environnementale_pc`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionEnvironnementalePc {
    pub code_station: Option<String>,
    pub libelle_station: Option<String>,
    pub uri_station: Option<String>,
    pub code_operation_cep: Option<String>,
    pub date_prelevement: Option<String>,
    pub code_parametre: Option<String>,
    pub libelle_parametre: Option<String>,
    pub uri_parametre: Option<String>,
    pub libelle_resultat: Option<String>,
    pub resultat: Option<String>,
    pub code_unite: Option<String>,
    pub symbole_unite: Option<String>,
    pub uri_unite: Option<String>,
    pub code_remarque: Option<String>,
    pub mnemo_remarque: Option<String>,
    pub code_groupe_parametre: Option<Vec<String>>,
    pub code_statut: Option<String>,
    pub libelle_groupe_parametre: Option<Vec<String>>,
    pub mnemo_statut: Option<String>,
    pub code_qualification: Option<String>,
    pub uri_groupe_parametre: Option<Vec<String>>,
    pub code_masse_deau: Option<String>,
    pub libelle_qualification: Option<String>,
    pub code_eu_masse_deau: Option<String>,
    pub commentaire: Option<String>,
    pub date_mesure: Option<String>,
    pub nom_masse_deau: Option<String>,
    pub heure_mesure: Option<String>,
    pub longitude: Option<f64>,
    pub code_methode: Option<String>,
    pub latitude: Option<f64>,
    pub nom_methode: Option<String>,
    pub uri_methode: Option<String>,
    pub code_producteur: Option<String>,
    pub nom_producteur: Option<String>,
    pub uri_producteur: Option<String>,
    pub code_preleveur: Option<String>,
    pub nom_preleveur: Option<String>,
    pub uri_preleveur: Option<String>,
    pub code_banque_reference: Option<String>,
    pub code_point_eau_surface: Option<String>,
    pub code_prelevement: Option<String>,
    pub date_maj: Option<String>,
    pub geometry: Option<Geometry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_record!(StationPc, AnalysePc, OperationPc, ConditionEnvironnementalePc);
