use crate::error::Result;
use futures_util::StreamExt;
use pdbscrape::engine::retrieval::{CoordinateFormat, Resource, RetrievalError, Retriever};
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// URL templates for each resource. `{id}` expands to the record identifier and `{CODE}`
/// to the upper-case ligand code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub pdb: String,
    pub mmcif: String,
    pub reflections: String,
    pub ligand: String,
}

impl Endpoints {
    pub fn url_for(&self, id: &str, resource: &Resource) -> String {
        match resource {
            Resource::Coordinates(CoordinateFormat::Pdb) => self.pdb.replace("{id}", id),
            Resource::Coordinates(CoordinateFormat::Mmcif) => self.mmcif.replace("{id}", id),
            Resource::Reflections => self.reflections.replace("{id}", id),
            Resource::LigandDefinition(code) => self
                .ligand
                .replace("{id}", id)
                .replace("{CODE}", &code.to_ascii_uppercase()),
        }
    }
}

/// Downloads resources over HTTP(S).
///
/// The pipeline is synchronous, so every download blocks on the runtime the retriever was
/// created in. Callers must run the pipeline inside `tokio::task::block_in_place`.
pub struct HttpRetriever {
    client: Client,
    endpoints: Endpoints,
    runtime: Handle,
}

impl HttpRetriever {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pdb-scrape/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoints,
            runtime: Handle::current(),
        })
    }

    async fn download(
        &self,
        id: &str,
        resource: &Resource,
        url: &str,
        dest: &Path,
    ) -> std::result::Result<(), RetrievalError> {
        let response = self.client.get(url).send().await.map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RetrievalError::not_found(id, resource));
        }
        let response = response.error_for_status().map_err(transport)?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(transport)?;
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        debug!("Wrote {} bytes to {}", written, dest.display());
        Ok(())
    }
}

impl Retriever for HttpRetriever {
    fn fetch(
        &self,
        id: &str,
        resource: &Resource,
        dest: &Path,
    ) -> std::result::Result<(), RetrievalError> {
        let url = self.endpoints.url_for(id, resource);
        info!("Downloading {} for {} from {}", resource, id, url);
        self.runtime.block_on(self.download(id, resource, &url, dest))
    }
}

fn transport(error: reqwest::Error) -> RetrievalError {
    RetrievalError::Transport(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints {
            pdb: "https://files.rcsb.org/download/{id}.pdb".into(),
            mmcif: "https://files.rcsb.org/download/{id}.cif".into(),
            reflections: "https://edmaps.rcsb.org/coefficients/{id}.mtz".into(),
            ligand: "https://files.rcsb.org/ligands/download/{CODE}.cif".into(),
        }
    }

    #[test]
    fn urls_expand_identifier_and_code() {
        let endpoints = endpoints();
        assert_eq!(
            endpoints.url_for("1abc", &Resource::Coordinates(CoordinateFormat::Pdb)),
            "https://files.rcsb.org/download/1abc.pdb"
        );
        assert_eq!(
            endpoints.url_for("1abc", &Resource::Coordinates(CoordinateFormat::Mmcif)),
            "https://files.rcsb.org/download/1abc.cif"
        );
        assert_eq!(
            endpoints.url_for("1abc", &Resource::Reflections),
            "https://edmaps.rcsb.org/coefficients/1abc.mtz"
        );
        assert_eq!(
            endpoints.url_for("1abc", &Resource::LigandDefinition("lza".into())),
            "https://files.rcsb.org/ligands/download/LZA.cif"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn retriever_builds_inside_a_runtime() {
        let retriever = HttpRetriever::new(endpoints(), Duration::from_secs(1)).unwrap();
        assert_eq!(retriever.endpoints, endpoints());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreachable_host_is_a_transport_error() {
        let mut local = endpoints();
        local.pdb = "http://127.0.0.1:9/{id}.pdb".into();
        let retriever = HttpRetriever::new(local, Duration::from_secs(2)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("1abc_rcsb.pdb");

        let result = tokio::task::block_in_place(|| {
            retriever.fetch("1abc", &Resource::Coordinates(CoordinateFormat::Pdb), &dest)
        });
        assert!(matches!(result, Err(RetrievalError::Transport(_))));
    }
}
