use lod_render::{
    Error, Node, PassthroughRenderer, PrefixTable, RdfFormat, RdfRenderer, Renderer,
    XmlRenderer, XmlRendererConfig,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::thread;

const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn prefixes() -> PrefixTable {
    PrefixTable::from_json(
        r#"{
            "dc": ["http://purl.org/dc/elements/1.1/"],
            "edm": "http://www.europeana.eu/schemas/edm/",
            "nave": ["http://schemas.delving.eu/nave/terms/", "http://example.org/nave/"]
        }"#,
    )
    .unwrap()
}

fn renderer() -> XmlRenderer {
    XmlRenderer::new(XmlRendererConfig::none().prefixes(prefixes()))
}

fn render_with<R: Renderer + ?Sized>(renderer: &R, data: &R::Input) -> (String, String) {
    (renderer.content_type(), renderer.render(Some(data)).unwrap())
}

fn search_result() -> Node {
    json!({
        "result": {
            "query": {
                "numfound": 1,
                "terms": "mona & lisa",
                "breadCrumbs": [
                    {"display": "all", "href": "/search", "isLast": false},
                    {"display": "mona lisa", "href": "/search?q=mona", "isLast": true}
                ]
            },
            "pagination": {
                "hasNext": false,
                "links": [
                    {"pageNumber": 1, "isLinked": false, "url": "/search?start=1"}
                ]
            },
            "items": [
                {
                    "item": {
                        "doc_id": "1",
                        "fields": {
                            "dc_title": ["Mona Lisa", "La Gioconda"],
                            "edm_isShownAt": "http://example.org/view/1"
                        }
                    }
                }
            ],
            "facets": [
                {"name": "dc_creator", "links": [
                    {"displayString": "Leonardo", "value": "Leonardo", "count": 1, "isSelected": true}
                ]}
            ]
        }
    })
    .into()
}

#[test]
fn search_result_document() {
    let (content_type, xml) = render_with(&renderer(), &search_result());

    assert_eq!(content_type, "application/xml; charset=utf-8");
    assert_eq!(
        xml,
        format!(
            "{}<result>\
             <query>\
             <numfound>1</numfound>\
             <terms>mona &amp; lisa</terms>\
             <breadCrumbs>\
             <breadcrumb href=\"/search\" isLast=\"false\">all</breadcrumb>\
             <breadcrumb href=\"/search?q=mona\" isLast=\"true\">mona lisa</breadcrumb>\
             </breadCrumbs>\
             </query>\
             <pagination>\
             <hasNext>False</hasNext>\
             <links><link isLinked=\"false\" url=\"/search?start=1\">1</link></links>\
             </pagination>\
             <items>\
             <item>\
             <doc_id>1</doc_id>\
             <fields>\
             <dc:title xmlns:dc=\"http://purl.org/dc/elements/1.1\">Mona Lisa</dc:title>\
             <dc:title xmlns:dc=\"http://purl.org/dc/elements/1.1\">La Gioconda</dc:title>\
             <edm:isShownAt xmlns:edm=\"http://www.europeana.eu/schemas/edm\">http://example.org/view/1</edm:isShownAt>\
             </fields>\
             </item>\
             </items>\
             <facets>\
             <facet>\
             <name>dc_creator</name>\
             <links><link value=\"Leonardo\" count=\"1\" isSelected=\"true\">Leonardo</link></links>\
             </facet>\
             </facets>\
             </result>",
            DECL
        )
    );
}

#[test]
fn first_candidate_uri_is_used() {
    let node = Node::seq(vec![Node::pair("nave_date_created", "1503")]);
    let xml = renderer().render(Some(&node)).unwrap();
    assert_eq!(
        xml,
        format!(
            "{}<nave:date_created xmlns:nave=\"http://schemas.delving.eu/nave/terms\">1503</nave:date_created>",
            DECL
        )
    );
}

#[test]
fn unknown_prefix_fails_whole_render() {
    let node: Node = json!({"fields": {"dc_title": "ok", "zz_title": "x"}}).into();
    match renderer().render(Some(&node)) {
        Err(Error::UnresolvedNamespace { prefix }) => assert_eq!(prefix, "zz"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn renderers_are_shareable_across_threads() {
    let renderer = renderer();
    let node = search_result();
    let expected = renderer.render(Some(&node)).unwrap();

    thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| renderer.render(Some(&node)).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn rdf_and_passthrough_renderers() {
    let n3 = r#"<http://example.org/item/1> <http://purl.org/dc/elements/1.1/title> "Mona Lisa" ."#;

    let (content_type, nt) = render_with(&RdfRenderer::new(RdfFormat::NTriples), n3);
    assert_eq!(content_type, "text/plain; charset=utf-8");
    assert_eq!(nt.trim_end(), n3);

    let (content_type, body) = render_with(&PassthroughRenderer::n3(), n3);
    assert_eq!(content_type, "text/n3; charset=utf-8");
    assert_eq!(body, n3);

    let renderer = RdfRenderer::new(RdfFormat::from_name("rdf").unwrap());
    assert_eq!(renderer.media_type(), "application/rdf+xml");
    assert!(renderer.render(Some(n3)).unwrap().contains("Mona Lisa"));
}
