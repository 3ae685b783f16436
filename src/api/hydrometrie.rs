use super::{Endpoint, HubeauClient, params};
use crate::error::Result;
use crate::fetch::HttpClient;
use crate::models::{ObsElab, ObservationTr, Site, Station};

/// Endpoints of `hydrometrie`.
pub struct Hydrometrie<'a, C> {
    client: &'a HubeauClient<C>,
}

impl<'a, C: HttpClient> Hydrometrie<'a, C> {
    pub(crate) fn new(client: &'a HubeauClient<C>) -> Self {
        Self { client }
    }

    pub async fn get_sites(&self, params: &[(String, String)]) -> Result<Vec<Site>> {
        Ok(self.client.get_page(Endpoint::Sites, params).await?.data)
    }

    pub async fn get_stations(&self, params: &[(String, String)]) -> Result<Vec<Station>> {
        Ok(self.client.get_page(Endpoint::Stations, params).await?.data)
    }

    pub async fn get_observations_tr(
        &self,
        params: &[(String, String)],
    ) -> Result<Vec<ObservationTr>> {
        Ok(self.client.get_page(Endpoint::ObservationsTr, params).await?.data)
    }

    pub async fn get_obs_elab(&self, params: &[(String, String)]) -> Result<Vec<ObsElab>> {
        Ok(self.client.get_page(Endpoint::ObsElab, params).await?.data)
    }

    pub async fn sites_by_department(&self, code_departement: &str, size: usize) -> Result<Vec<Site>> {
        self.get_sites(&params(&[
            ("code_departement", code_departement.to_string()),
            ("size", size.to_string()),
        ]))
        .await
    }

    pub async fn stations_by_commune(
        &self,
        code_commune_station: &str,
        size: usize,
    ) -> Result<Vec<Station>> {
        self.get_stations(&params(&[
            ("code_commune_station", code_commune_station.to_string()),
            ("size", size.to_string()),
        ]))
        .await
    }

    pub async fn observations_by_station(
        &self,
        code_station: &str,
        size: usize,
    ) -> Result<Vec<ObservationTr>> {
        self.get_observations_tr(&params(&[
            ("code_entite", code_station.to_string()),
            ("size", size.to_string()),
        ]))
        .await
    }

    /// Elaborated observations of a station, e.g. `grandeur = "QmM"` for monthly mean flow.
    pub async fn obs_elab_by_station(
        &self,
        code_station: &str,
        grandeur: &str,
        size: usize,
    ) -> Result<Vec<ObsElab>> {
        self.get_obs_elab(&params(&[
            ("code_entite", code_station.to_string()),
            ("grandeur_hydro_elab", grandeur.to_string()),
            ("size", size.to_string()),
        ]))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{ScriptedClient, envelope, query_param};
    use serde_json::json;

    #[tokio::test]
    async fn test_obs_elab_by_station() {
        let client = HubeauClient::with_http_client(
            ScriptedClient::new(|_| {
                (
                    200,
                    envelope(
                        1,
                        vec![json!({
                            "code_station": "Y390001001",
                            "date_obs_elab": "2024-01-01",
                            "grandeur_hydro_elab": "QmM",
                            "resultat_obs_elab": 980.2
                        })],
                    ),
                )
            }),
            "https://example.org/api/v2",
        );

        let obs = client
            .hydrometrie()
            .obs_elab_by_station("Y390001001", "QmM", 1)
            .await
            .unwrap();

        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].date_obs_elab.as_deref(), Some("2024-01-01"));
        let req = &client.http().requests()[0];
        assert_eq!(req.path(), "/api/v2/hydrometrie/obs_elab");
        assert_eq!(query_param(req, "grandeur_hydro_elab").as_deref(), Some("QmM"));
    }

    #[tokio::test]
    async fn test_sites_by_department_http_error() {
        let client = HubeauClient::with_http_client(
            ScriptedClient::new(|_| (400, "{}".to_string())),
            "https://example.org/api/v2",
        );

        let result = client.hydrometrie().sites_by_department("95", 1).await;
        assert!(result.is_err());
    }
}
