use chrono::{SecondsFormat, Utc};

use crate::{
    error::{NanopubError, Result},
    nanopub::NanopubConfig,
    rdf::{Literal, Quad, Term, Triple},
    vocab::{fragment, np, npx, prov, rdf, xsd},
};

/// Builds the quads of an unsigned nanopublication from caller graphs.
///
/// The head graph and its links are added, blank nodes are promoted to IRIs
/// under the placeholder base using their labels, and the provenance and
/// pubinfo statements requested by `config` are appended.
///
/// # Arguments
/// * `config` - Placeholder, attribution and timestamp options
/// * `assertion` - Assertion statements, must not be empty
/// * `provenance` - Provenance statements about the assertion
/// * `pubinfo` - Publication-info statements
///
/// # Errors
/// * [`NanopubError::ConflictingConfig`] - an attribution is requested twice,
///   or the caller graphs already hold a statement `config` would add
/// * [`NanopubError::Profile`] - profile attribution without a profile
/// * [`NanopubError::Malformed`] - a content graph ends up empty
pub fn assemble(
    config: &NanopubConfig,
    assertion: Vec<Triple>,
    provenance: Vec<Triple>,
    pubinfo: Vec<Triple>,
) -> Result<Vec<Quad>> {
    check_conflicts(config, &assertion, &provenance, &pubinfo)?;

    let uri = config.placeholder.as_str();
    let base = if uri.ends_with('#') || uri.ends_with('/') {
        uri.to_owned()
    } else {
        format!("{uri}#")
    };
    let head_graph = format!("{base}{}", fragment::HEAD);
    let assertion_graph = format!("{base}{}", fragment::ASSERTION);
    let provenance_graph = format!("{base}{}", fragment::PROVENANCE);
    let pubinfo_graph = format!("{base}{}", fragment::PUBINFO);

    let promote = |triple: Triple| {
        Triple::new(
            promote_blank(triple.subject, &base),
            promote_blank(triple.predicate, &base),
            promote_blank(triple.object, &base),
        )
    };
    let assertion: Vec<Triple> = assertion.into_iter().map(promote).collect();
    let mut provenance: Vec<Triple> = provenance.into_iter().map(promote).collect();
    let mut pubinfo: Vec<Triple> = pubinfo.into_iter().map(promote).collect();

    let head_subject = Term::iri(uri);
    let assertion_subject = Term::iri(assertion_graph.as_str());
    let now = || {
        Term::Literal(Literal::typed(
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            xsd::DATE_TIME,
        ))
    };

    if config.add_prov_generated_time {
        provenance.push(Triple::new(
            assertion_subject.clone(),
            Term::iri(prov::GENERATED_AT_TIME),
            now(),
        ));
    }
    if let Some(agent) = attribution(
        config,
        config.attribute_assertion_to_profile,
        &config.assertion_attributed_to,
    )? {
        provenance.push(Triple::new(
            assertion_subject.clone(),
            Term::iri(prov::WAS_ATTRIBUTED_TO),
            Term::iri(agent),
        ));
    }
    for source in &config.derived_from {
        provenance.push(Triple::new(
            assertion_subject.clone(),
            Term::iri(prov::WAS_DERIVED_FROM),
            Term::iri(source.as_str()),
        ));
    }

    if config.add_pubinfo_generated_time {
        pubinfo.push(Triple::new(
            head_subject.clone(),
            Term::iri(prov::GENERATED_AT_TIME),
            now(),
        ));
    }
    if let Some(agent) = attribution(
        config,
        config.attribute_publication_to_profile,
        &config.publication_attributed_to,
    )? {
        pubinfo.push(Triple::new(
            head_subject.clone(),
            Term::iri(prov::WAS_ATTRIBUTED_TO),
            Term::iri(agent),
        ));
    }
    if let Some(concept) = &config.introduces_concept {
        let concept = match concept.strip_prefix("_:") {
            Some(label) => Term::iri(format!("{base}{label}")),
            None => Term::iri(concept.as_str()),
        };
        pubinfo.push(Triple::new(
            head_subject.clone(),
            Term::iri(npx::INTRODUCES),
            concept,
        ));
    }

    for (triples, name) in [
        (&assertion, "assertion"),
        (&provenance, "provenance"),
        (&pubinfo, "publication info"),
    ] {
        if triples.is_empty() {
            return Err(NanopubError::malformed(format!("{name} graph is empty")));
        }
    }

    let head = [
        (rdf::TYPE, np::NANOPUBLICATION),
        (np::HAS_ASSERTION, assertion_graph.as_str()),
        (np::HAS_PROVENANCE, provenance_graph.as_str()),
        (np::HAS_PUBLICATION_INFO, pubinfo_graph.as_str()),
    ]
    .into_iter()
    .map(|(predicate, object)| {
        Triple::new(head_subject.clone(), Term::iri(predicate), Term::iri(object))
            .in_graph(&head_graph)
    });

    let mut quads: Vec<Quad> = head.collect();
    quads.extend(assertion.into_iter().map(|t| t.in_graph(&assertion_graph)));
    quads.extend(provenance.into_iter().map(|t| t.in_graph(&provenance_graph)));
    quads.extend(pubinfo.into_iter().map(|t| t.in_graph(&pubinfo_graph)));

    log::trace!("assembled {} quads under {base}", quads.len());
    Ok(quads)
}

fn promote_blank(term: Term, base: &str) -> Term {
    match term {
        Term::Blank(label) => Term::Iri(format!("{base}{label}")),
        other => other,
    }
}

/// Agent an attribution points at, if one is configured.
fn attribution(
    config: &NanopubConfig,
    to_profile: bool,
    explicit: &Option<String>,
) -> Result<Option<String>> {
    if !to_profile {
        return Ok(explicit.clone());
    }
    config
        .profile
        .as_ref()
        .map(|profile| Some(profile.orcid_id.clone()))
        .ok_or_else(|| {
            NanopubError::Profile("attribution to the profile requires a profile".to_owned())
        })
}

fn check_conflicts(
    config: &NanopubConfig,
    assertion: &[Triple],
    provenance: &[Triple],
    pubinfo: &[Triple],
) -> Result<()> {
    if config.attribute_assertion_to_profile && config.assertion_attributed_to.is_some() {
        return Err(NanopubError::conflict(
            "assertion is attributed both to the profile and to an explicit IRI",
        ));
    }
    if config.attribute_publication_to_profile && config.publication_attributed_to.is_some() {
        return Err(NanopubError::conflict(
            "publication is attributed both to the profile and to an explicit IRI",
        ));
    }

    let has = |triples: &[Triple], predicate: &str| {
        triples.iter().any(|t| t.predicate.is_iri(predicate))
    };

    if [assertion, provenance, pubinfo]
        .into_iter()
        .any(|graph| has(graph, npx::HAS_SIGNATURE))
    {
        return Err(NanopubError::conflict(
            "npx:hasSignature is added by signing and cannot be supplied",
        ));
    }
    let attributes_assertion =
        config.attribute_assertion_to_profile || config.assertion_attributed_to.is_some();
    if attributes_assertion && has(provenance, prov::WAS_ATTRIBUTED_TO) {
        return Err(NanopubError::conflict(
            "provenance already contains prov:wasAttributedTo",
        ));
    }
    let attributes_publication =
        config.attribute_publication_to_profile || config.publication_attributed_to.is_some();
    if attributes_publication && has(pubinfo, prov::WAS_ATTRIBUTED_TO) {
        return Err(NanopubError::conflict(
            "pubinfo already contains prov:wasAttributedTo",
        ));
    }
    if config.introduces_concept.is_some() && has(pubinfo, npx::INTRODUCES) {
        return Err(NanopubError::conflict(
            "pubinfo already contains npx:introduces",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{error::ErrorKind, nanopub::NanopubStructure, profile::Profile, vocab::PLACEHOLDER_URI};

    const ORCID: &str = "https://orcid.org/0000-0000-0000-0000";

    fn profile() -> Profile {
        Profile {
            orcid_id: ORCID.to_owned(),
            name: "Test".to_owned(),
            public_key: PathBuf::from("id_rsa.pub"),
            private_key: PathBuf::from("id_rsa"),
            introduction_nanopub_uri: None,
        }
    }

    fn claim(subject: Term) -> Triple {
        Triple::new(
            subject,
            Term::iri("http://purl.org/petapico/o/hycl#claims"),
            Term::literal("This is a test of nanopub-python"),
        )
    }

    fn sub(suffix: &str) -> String {
        format!("{PLACEHOLDER_URI}#{suffix}")
    }

    #[test]
    fn assembles_four_graphs() {
        let config = NanopubConfig::with_profile(profile());
        let quads = assemble(&config, vec![claim(Term::iri("http://test"))], vec![], vec![]).unwrap();

        let structure = NanopubStructure::from_quads(&quads).unwrap();
        assert_eq!(structure.uri, PLACEHOLDER_URI);
        assert_eq!(structure.assertion, sub("assertion"));
        assert_eq!(structure.pubinfo, sub("pubInfo"));

        let attributed = Triple::new(
            Term::iri(sub("assertion")),
            Term::iri(prov::WAS_ATTRIBUTED_TO),
            Term::iri(ORCID),
        )
        .in_graph(&sub("provenance"));
        assert!(quads.contains(&attributed));
        assert!(quads
            .iter()
            .any(|q| q.in_graph(&sub("pubInfo")) && q.predicate.is_iri(prov::GENERATED_AT_TIME)));
    }

    #[test]
    fn blank_nodes_are_promoted() {
        let config = NanopubConfig {
            introduces_concept: Some("_:concept".to_owned()),
            ..NanopubConfig::with_profile(profile())
        };
        let quads = assemble(&config, vec![claim(Term::blank("test"))], vec![], vec![]).unwrap();

        assert!(quads.iter().any(|q| q.subject == Term::iri(sub("test"))));
        assert!(quads.iter().all(|q| !matches!(q.subject, Term::Blank(_))));
        assert!(quads
            .iter()
            .any(|q| q.predicate.is_iri(npx::INTRODUCES) && q.object == Term::iri(sub("concept"))));
    }

    #[test]
    fn derived_from_goes_to_provenance() {
        let config = NanopubConfig {
            derived_from: vec!["http://ex/a".to_owned(), "http://ex/b".to_owned()],
            ..Default::default()
        };
        let quads = assemble(&config, vec![claim(Term::iri("http://test"))], vec![], vec![]).unwrap();
        let derived = quads
            .iter()
            .filter(|q| q.in_graph(&sub("provenance")) && q.predicate.is_iri(prov::WAS_DERIVED_FROM))
            .count();
        assert_eq!(derived, 2);
    }

    #[test]
    fn profile_attribution_requires_profile() {
        let config = NanopubConfig {
            attribute_assertion_to_profile: true,
            ..Default::default()
        };
        let err = assemble(&config, vec![claim(Term::iri("http://test"))], vec![], vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Profile);
    }

    #[test]
    fn empty_content_graphs_are_malformed() {
        let config = NanopubConfig::default();
        let err = assemble(&config, vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);

        // nothing configured for provenance
        let err = assemble(&config, vec![claim(Term::iri("http://test"))], vec![], vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    macro_rules! tests {
        ($($name:ident: $config:expr, $provenance:expr, $pubinfo:expr),* $(,)?) => {
            $(
                #[test]
                fn $name() {
                    let err = assemble(
                        &$config,
                        vec![claim(Term::iri("http://test"))],
                        $provenance,
                        $pubinfo,
                    )
                    .unwrap_err();
                    assert_eq!(err.kind(), ErrorKind::ConflictingConfig, "{err}");
                }
            )*
        };
    }

    fn attributed(subject: &str) -> Vec<Triple> {
        vec![Triple::new(
            Term::iri(subject),
            Term::iri(prov::WAS_ATTRIBUTED_TO),
            Term::iri(ORCID),
        )]
    }

    tests! {
        assertion_attributed_twice: NanopubConfig {
            assertion_attributed_to: Some(ORCID.to_owned()),
            ..NanopubConfig::with_profile(profile())
        }, vec![], vec![],
        publication_attributed_twice: NanopubConfig {
            publication_attributed_to: Some(ORCID.to_owned()),
            ..NanopubConfig::with_profile(profile())
        }, vec![], vec![],
        caller_provenance_attribution: NanopubConfig::with_profile(profile()),
            attributed(&sub("assertion")), vec![],
        caller_pubinfo_attribution: NanopubConfig::with_profile(profile()),
            vec![], attributed(PLACEHOLDER_URI),
        caller_introduces: NanopubConfig {
            introduces_concept: Some("http://ex/concept".to_owned()),
            ..NanopubConfig::with_profile(profile())
        }, vec![], vec![Triple::new(
            Term::iri(PLACEHOLDER_URI),
            Term::iri(npx::INTRODUCES),
            Term::iri("http://ex/other"),
        )],
        caller_signature: NanopubConfig::with_profile(profile()), vec![], vec![Triple::new(
            Term::iri(sub("sig")),
            Term::iri(npx::HAS_SIGNATURE),
            Term::literal("abc"),
        )],
    }
}
