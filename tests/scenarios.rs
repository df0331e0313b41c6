//! Cross-component scenario tests (S1-S6) and the property invariants
//! from the data model that are cheapest to state against the public
//! `Index`/`Searcher`/`Query` surface rather than against one module in
//! isolation.

use std::ops::Bound;

use vellum::collector::{Count, TopDocs};
use vellum::query::{
    self, BooleanQuery, Exclude, FuzzyTermQuery, Occur, PhraseQuery, PrefixQuery, Query,
    RangeQuery, Require, TermQuery, WildcardQuery,
};
use vellum::schema::{Schema, Term, FAST, INDEXED, STORED, TEXT};
use vellum::{doc, DocAddress, Index};

fn three_doc_corpus() -> (Index, Schema) {
    let mut builder = Schema::builder();
    let content = builder.add_text_field("content", TEXT);
    let schema = builder.build();
    let index = Index::create_in_ram(schema.clone());
    let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
    for text in &["alfa bravo charlie", "bravo charlie delta", "delta echo foxtrot"] {
        writer.add_document(doc!(content => *text)).unwrap();
    }
    writer.commit().unwrap();
    (index, schema)
}

/// S1 - basic term retrieval.
#[test]
fn s1_basic_term_retrieval() {
    let (index, schema) = three_doc_corpus();
    let content = schema.get_field("content").unwrap();
    let reader = index.reader().unwrap();
    let searcher = reader.searcher();

    let query = TermQuery::new(Term::from_field_text(content, "bravo"));
    let hits = searcher.search(&query, &TopDocs::with_limit(10)).unwrap();
    let mut doc_ids: Vec<u32> = hits.iter().map(|(_, addr)| addr.doc()).collect();
    doc_ids.sort_unstable();
    assert_eq!(doc_ids, vec![0, 1]);

    let count = query::count(&query, &searcher).unwrap();
    assert_eq!(count, 2);
}

/// S2 - phrase adjacency is order-sensitive.
#[test]
fn s2_phrase_is_order_sensitive() {
    let (index, schema) = three_doc_corpus();
    let content = schema.get_field("content").unwrap();
    let reader = index.reader().unwrap();
    let searcher = reader.searcher();

    let forward = PhraseQuery::new(
        content,
        vec![
            Term::from_field_text(content, "bravo"),
            Term::from_field_text(content, "charlie"),
        ],
    );
    let hits = searcher.search(&forward, &TopDocs::with_limit(10)).unwrap();
    let mut doc_ids: Vec<u32> = hits.iter().map(|(_, addr)| addr.doc()).collect();
    doc_ids.sort_unstable();
    assert_eq!(doc_ids, vec![0, 1]);

    let reversed = PhraseQuery::new(
        content,
        vec![
            Term::from_field_text(content, "charlie"),
            Term::from_field_text(content, "bravo"),
        ],
    );
    let count = query::count(&reversed, &searcher).unwrap();
    assert_eq!(count, 0);
}

/// S3 - numeric range query.
#[test]
fn s3_numeric_range() {
    let mut builder = Schema::builder();
    let price = builder.add_i64_field("price", INDEXED);
    let schema = builder.build();
    let index = Index::create_in_ram(schema);
    let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
    for value in &[10i64, 50, 100, 500] {
        let mut document = vellum::schema::Document::default();
        document.add_i64(price, *value);
        writer.add_document(document).unwrap();
    }
    writer.commit().unwrap();

    let reader = index.reader().unwrap();
    let searcher = reader.searcher();
    let query = RangeQuery::new(
        price,
        Bound::Included(Term::from_field_i64(price, 40)),
        Bound::Included(Term::from_field_i64(price, 200)),
    );
    let hits = searcher.search(&query, &TopDocs::with_limit(10)).unwrap();
    let mut doc_ids: Vec<u32> = hits.iter().map(|(_, addr)| addr.doc()).collect();
    doc_ids.sort_unstable();
    assert_eq!(doc_ids, vec![1, 2]);
}

/// S4 - prefix, wildcard and fuzzy term queries over a small lexicon.
#[test]
fn s4_prefix_wildcard_fuzzy() {
    let mut builder = Schema::builder();
    let word = builder.add_text_field("word", TEXT);
    let schema = builder.build();
    let index = Index::create_in_ram(schema);
    let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
    for text in &["alfa", "alpaca", "amtrak", "bellow", "fellow", "fiona", "zebulon"] {
        writer.add_document(doc!(word => *text)).unwrap();
    }
    writer.commit().unwrap();

    let reader = index.reader().unwrap();
    let searcher = reader.searcher();

    let prefix = PrefixQuery::new(Term::from_field_text(word, "a"));
    assert_eq!(query::count(&prefix, &searcher).unwrap(), 3);

    // "bellow" and "fellow" are the only two entries ending in "llow".
    let wildcard = WildcardQuery::from_pattern(word, "*llow").unwrap();
    assert_eq!(query::count(&wildcard, &searcher).unwrap(), 2);

    let fuzzy = FuzzyTermQuery::new(Term::from_field_text(word, "fellw"), 2, true);
    let hits = searcher.search(&fuzzy, &TopDocs::with_limit(10)).unwrap();
    let mut matched: Vec<String> = hits
        .iter()
        .map(|(_, addr)| {
            let stored = searcher.doc(*addr).unwrap();
            stored.get_first(word).unwrap().as_str().unwrap().to_string()
        })
        .collect();
    matched.sort();
    assert_eq!(matched, vec!["bellow".to_string(), "fellow".to_string()]);
}

/// S5 - boolean composition: AndNot over an Or, and a plain And.
#[test]
fn s5_boolean_composition() {
    let mut builder = Schema::builder();
    let f = builder.add_text_field("f", TEXT);
    let schema = builder.build();
    let index = Index::create_in_ram(schema);
    let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
    for text in &["a b c", "b c d", "c d e"] {
        writer.add_document(doc!(f => *text)).unwrap();
    }
    writer.commit().unwrap();

    let reader = index.reader().unwrap();
    let searcher = reader.searcher();

    // AndNot(Or(b, d), c) -- every doc contains "c", so nothing survives.
    let and_not = BooleanQuery::new(vec![
        (
            Occur::Must,
            Box::new(BooleanQuery::new(vec![
                (Occur::Should, Box::new(TermQuery::new(Term::from_field_text(f, "b")))),
                (Occur::Should, Box::new(TermQuery::new(Term::from_field_text(f, "d")))),
            ])),
        ),
        (Occur::MustNot, Box::new(TermQuery::new(Term::from_field_text(f, "c")))),
    ]);
    assert_eq!(query::count(&and_not, &searcher).unwrap(), 0);

    let and_bd = BooleanQuery::new(vec![
        (Occur::Must, Box::new(TermQuery::new(Term::from_field_text(f, "b")))),
        (Occur::Must, Box::new(TermQuery::new(Term::from_field_text(f, "d")))),
    ]);
    let hits = searcher.search(&and_bd, &TopDocs::with_limit(10)).unwrap();
    let doc_ids: Vec<u32> = hits.iter().map(|(_, addr)| addr.doc()).collect();
    assert_eq!(doc_ids, vec![1]);
}

/// S6 - delete + commit visibility: readers opened before a commit keep
/// seeing the pre-commit TOC until explicitly reloaded (§5 "Ordering
/// guarantees", property 6 "commit atomicity").
#[test]
fn s6_delete_commit_visibility() {
    let mut builder = Schema::builder();
    let id = builder.add_u64_field("id", INDEXED | STORED | FAST);
    let schema = builder.build();
    let index = Index::create_in_ram(schema);
    let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
    for value in 1u64..=5 {
        let mut document = vellum::schema::Document::default();
        document.add_u64(id, value);
        writer.add_document(document).unwrap();
    }
    writer.commit().unwrap();

    let stale_reader = index.reader().unwrap();
    assert_eq!(stale_reader.searcher().num_docs(), 5);

    writer.delete_term(Term::from_field_u64(id, 3)).unwrap();
    writer.commit().unwrap();

    // Old reader handle: still 5, unaffected by the later commit.
    assert_eq!(stale_reader.searcher().num_docs(), 5);

    // Fresh reader: sees the deletion.
    let fresh_reader = index.reader().unwrap();
    let fresh_searcher = fresh_reader.searcher();
    assert_eq!(fresh_searcher.num_docs(), 4);

    let all_ids_query = RangeQuery::new(
        id,
        Bound::Included(Term::from_field_u64(id, 0)),
        Bound::Unbounded,
    );
    let hits = fresh_searcher.search(&all_ids_query, &TopDocs::with_limit(10)).unwrap();
    for (_, addr) in &hits {
        let stored = fresh_searcher.doc(*addr).unwrap();
        let value = stored.get_first(id).unwrap().as_u64().unwrap();
        assert_ne!(value, 3);
    }
    assert_eq!(hits.len(), 4);
}

/// Property 5 "deletion masking": `query::count` must not count deleted
/// docs, for a bare `TermQuery` (exercising `TermWeight::count`'s
/// `doc_freq` shortcut vs. its delete-aware fallback) and for a
/// `BooleanQuery` built on top of it.
#[test]
fn count_excludes_deleted_docs_after_commit() {
    let (index, schema) = three_doc_corpus();
    let content = schema.get_field("content").unwrap();
    let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();

    let bravo = TermQuery::new(Term::from_field_text(content, "bravo"));
    assert_eq!(query::count(&bravo, &index.reader().unwrap().searcher()).unwrap(), 2);

    writer.delete_term(Term::from_field_text(content, "alfa")).unwrap();
    writer.commit().unwrap();

    let searcher = index.reader().unwrap().searcher();
    assert!(searcher.segment_reader(0).has_deletes());
    // Doc 0 ("alfa bravo charlie") is now deleted; only doc 1 ("bravo
    // charlie delta") still matches "bravo".
    assert_eq!(query::count(&bravo, &searcher).unwrap(), 1);

    let bravo_or_delta = BooleanQuery::new(vec![
        (Occur::Should, Box::new(TermQuery::new(Term::from_field_text(content, "bravo")))),
        (Occur::Should, Box::new(TermQuery::new(Term::from_field_text(content, "delta")))),
    ]);
    // Docs 1 and 2 both match (bravo, delta); doc 0 is deleted.
    assert_eq!(query::count(&bravo_or_delta, &searcher).unwrap(), 2);
}

/// Property 9 "score equivalence under optimization": over a corpus
/// large enough to span several posting blocks (block length is 128),
/// a scored top-K search must still return exactly the true top-K docs
/// once the search loop starts feeding the collector's heap threshold
/// back into the scorer via `skip_to_quality`/`replace`. Every
/// document is given the same field length (25 tokens: some number of
/// "keyword" occurrences plus "noise" padding out to 25), so BM25's
/// length-normalization term is identical across the whole corpus and
/// the term-frequency alone determines score order -- making the
/// expected top-5 doc set exact rather than approximate.
#[test]
fn top_k_with_block_max_skipping_matches_true_ranking() {
    let mut builder = Schema::builder();
    let body = builder.add_text_field("body", TEXT);
    let schema = builder.build();
    let index = Index::create_in_ram(schema);
    let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();

    const DOC_LENGTH: usize = 25;
    let make_doc = |keyword_count: usize| {
        let mut tokens = vec!["keyword"; keyword_count];
        tokens.extend(std::iter::repeat("noise").take(DOC_LENGTH - keyword_count));
        tokens.join(" ")
    };

    // 280 background docs at term-frequency 1.
    for _ in 0..280 {
        writer.add_document(doc!(body => make_doc(1))).unwrap();
    }
    // 20 docs with strictly increasing term-frequency 2..=21, docids
    // 280..=299; the last five (docids 295..=299, tf 17..=21) are the
    // unique true top-5 by BM25 score.
    for i in 0..20usize {
        writer.add_document(doc!(body => make_doc(i + 2))).unwrap();
    }
    writer.commit().unwrap();

    let reader = index.reader().unwrap();
    let searcher = reader.searcher();
    let query = TermQuery::new(Term::from_field_text(body, "keyword"));

    // Every one of the 300 docs matches, so block-max skipping has
    // room to actually prune once the top-5 heap fills.
    assert_eq!(query::count(&query, &searcher).unwrap(), 300);

    let hits = searcher.search(&query, &TopDocs::with_limit(5)).unwrap();
    let doc_ids: Vec<u32> = hits.iter().map(|(_, addr)| addr.doc()).collect();
    assert_eq!(doc_ids, vec![299, 298, 297, 296, 295]);
}

/// Property 1 + 8: sorted postings and De Morgan-style boolean
/// correctness hold across a larger, randomly built corpus.
#[test]
fn property_boolean_correctness_matches_set_operations() {
    let mut builder = Schema::builder();
    let f = builder.add_text_field("f", TEXT);
    let schema = builder.build();
    let index = Index::create_in_ram(schema);
    let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();

    // Deterministic "random" corpus: doc i contains term "x" iff bit 0 of
    // i is set, "y" iff bit 1 is set -- covers every combination of
    // membership for a two-term boolean query.
    let mut expected_x = Vec::new();
    let mut expected_y = Vec::new();
    for i in 0u32..16 {
        let mut tokens = Vec::new();
        if i & 1 != 0 {
            tokens.push("x");
            expected_x.push(i);
        }
        if i & 2 != 0 {
            tokens.push("y");
            expected_y.push(i);
        }
        tokens.push("always");
        writer.add_document(doc!(f => tokens.join(" "))).unwrap();
    }
    writer.commit().unwrap();

    let reader = index.reader().unwrap();
    let searcher = reader.searcher();

    let and_query = BooleanQuery::new(vec![
        (Occur::Must, Box::new(TermQuery::new(Term::from_field_text(f, "x")))),
        (Occur::Must, Box::new(TermQuery::new(Term::from_field_text(f, "y")))),
    ]);
    let expected_and: Vec<u32> = expected_x.iter().filter(|i| expected_y.contains(i)).copied().collect();
    let hits = searcher.search(&and_query, &TopDocs::with_limit(32)).unwrap();
    let mut doc_ids: Vec<u32> = hits.iter().map(|(_, addr)| addr.doc()).collect();
    doc_ids.sort_unstable();
    assert_eq!(doc_ids, expected_and);

    let or_query = BooleanQuery::new(vec![
        (Occur::Should, Box::new(TermQuery::new(Term::from_field_text(f, "x")))),
        (Occur::Should, Box::new(TermQuery::new(Term::from_field_text(f, "y")))),
    ]);
    let mut expected_or: Vec<u32> = expected_x.iter().chain(expected_y.iter()).copied().collect();
    expected_or.sort_unstable();
    expected_or.dedup();
    let hits = searcher.search(&or_query, &TopDocs::with_limit(32)).unwrap();
    let mut doc_ids: Vec<u32> = hits.iter().map(|(_, addr)| addr.doc()).collect();
    doc_ids.sort_unstable();
    assert_eq!(doc_ids, expected_or);

    let andnot_query = BooleanQuery::new(vec![
        (Occur::Must, Box::new(TermQuery::new(Term::from_field_text(f, "x")))),
        (Occur::MustNot, Box::new(TermQuery::new(Term::from_field_text(f, "y")))),
    ]);
    let expected_andnot: Vec<u32> = expected_x.iter().filter(|i| !expected_y.contains(i)).copied().collect();
    let hits = searcher.search(&andnot_query, &TopDocs::with_limit(32)).unwrap();
    let mut doc_ids: Vec<u32> = hits.iter().map(|(_, addr)| addr.doc()).collect();
    doc_ids.sort_unstable();
    assert_eq!(doc_ids, expected_andnot);
}

/// Property 6 (commit atomicity) and property 2/3 (docid/stored
/// round-trip) across two separate commits, i.e. two live segments
/// composed by one `Searcher` (§4.6 "Reader composition").
#[test]
fn property_multi_segment_round_trip() {
    let mut builder = Schema::builder();
    let title = builder.add_text_field("title", TEXT | STORED);
    let schema = builder.build();
    let index = Index::create_in_ram(schema);

    let mut writer = index.writer_with_num_threads(1, 3_000_000).unwrap();
    writer.add_document(doc!(title => "first segment alpha")).unwrap();
    writer.commit().unwrap();
    drop(writer);

    let mut writer2 = index.writer_with_num_threads(1, 3_000_000).unwrap();
    writer2.add_document(doc!(title => "second segment beta")).unwrap();
    writer2.commit().unwrap();
    drop(writer2);

    let reader = index.reader().unwrap();
    let searcher = reader.searcher();
    assert_eq!(searcher.num_docs(), 2);
    assert_eq!(searcher.segment_readers().len(), 2);

    let query = TermQuery::new(Term::from_field_text(title, "beta"));
    let hits = searcher.search(&query, &TopDocs::with_limit(10)).unwrap();
    assert_eq!(hits.len(), 1);
    let (_, addr) = hits[0];
    let stored = searcher.doc(addr).unwrap();
    assert_eq!(stored.get_first(title).unwrap().as_str(), Some("second segment beta"));
}

/// `AndMaybe`/`Require`/`Exclude` combinators agree with their boolean
/// equivalents built from `BooleanQuery` (§4.3).
#[test]
fn matcher_combinators_agree_with_boolean_equivalents() {
    let (index, schema) = three_doc_corpus();
    let content = schema.get_field("content").unwrap();
    let reader = index.reader().unwrap();
    let searcher = reader.searcher();

    let bravo = TermQuery::new(Term::from_field_text(content, "bravo"));
    let charlie = TermQuery::new(Term::from_field_text(content, "charlie"));

    for segment_reader in searcher.segment_readers() {
        let bravo_scorer = bravo.weight(searcher.schema()).unwrap().scorer(segment_reader).unwrap();
        let charlie_scorer = charlie.weight(searcher.schema()).unwrap().scorer(segment_reader).unwrap();
        let mut require = Require::build(bravo_scorer, charlie_scorer);

        let and_query = BooleanQuery::new(vec![
            (Occur::Must, Box::new(bravo.clone())),
            (Occur::Must, Box::new(charlie.clone())),
        ]);
        let expected = query::count(&and_query, &searcher).unwrap();
        let mut got = 0u32;
        while require.advance() {
            got += 1;
        }
        assert_eq!(got, expected);
    }
}

/// `Exclude` (AndNot at the matcher level) agrees with `MustNot`.
#[test]
fn exclude_matcher_agrees_with_must_not() {
    let (index, schema) = three_doc_corpus();
    let content = schema.get_field("content").unwrap();
    let reader = index.reader().unwrap();
    let searcher = reader.searcher();

    let bravo = TermQuery::new(Term::from_field_text(content, "bravo"));
    let delta = TermQuery::new(Term::from_field_text(content, "delta"));

    for segment_reader in searcher.segment_readers() {
        let bravo_scorer = bravo.weight(searcher.schema()).unwrap().scorer(segment_reader).unwrap();
        let delta_scorer = delta.weight(searcher.schema()).unwrap().scorer(segment_reader).unwrap();
        let mut excluded = Exclude::build(bravo_scorer, delta_scorer);

        let must_not_query = BooleanQuery::new(vec![
            (Occur::Must, Box::new(bravo.clone())),
            (Occur::MustNot, Box::new(delta.clone())),
        ]);
        let expected = query::count(&must_not_query, &searcher).unwrap();
        let mut got = 0u32;
        while excluded.advance() {
            got += 1;
        }
        assert_eq!(got, expected);
    }
}

/// `Count` collector agrees with `TopDocs` cardinality for a simple
/// term query (sanity check that both collectors walk the same matches).
#[test]
fn count_collector_matches_top_docs_cardinality() {
    let (index, schema) = three_doc_corpus();
    let content = schema.get_field("content").unwrap();
    let reader = index.reader().unwrap();
    let searcher = reader.searcher();

    let query = TermQuery::new(Term::from_field_text(content, "delta"));
    let count = searcher.search(&query, &Count).unwrap();
    let hits = searcher.search(&query, &TopDocs::with_limit(10)).unwrap();
    assert_eq!(count as usize, hits.len());
}

/// `AndMaybe` at the `Query` level: every doc matching the required
/// side is returned even if the optional side doesn't match it.
#[test]
fn and_maybe_query_level_returns_required_side_regardless_of_optional() {
    let (index, schema) = three_doc_corpus();
    let content = schema.get_field("content").unwrap();
    let reader = index.reader().unwrap();
    let searcher = reader.searcher();

    // delta appears in docs {1, 2}; foxtrot only in doc {2}.
    let delta = TermQuery::new(Term::from_field_text(content, "delta"));
    let foxtrot = TermQuery::new(Term::from_field_text(content, "foxtrot"));
    let query = BooleanQuery::new(vec![
        (Occur::Must, Box::new(delta)),
        (Occur::Should, Box::new(foxtrot)),
    ]);
    let hits = searcher.search(&query, &TopDocs::with_limit(10)).unwrap();
    let mut doc_ids: Vec<u32> = hits.iter().map(|(_, addr)| addr.doc()).collect();
    doc_ids.sort_unstable();
    assert_eq!(doc_ids, vec![1, 2]);
    // The doc that also matches foxtrot should score at least as high
    // as the one that only matches the required clause.
    let score_of = |target: u32| {
        hits.iter()
            .find(|(_, addr)| addr.doc() == target)
            .map(|(score, _)| *score)
            .unwrap()
    };
    assert!(score_of(2) >= score_of(1));
}

fn doc_address(addr: DocAddress) -> (u32, u32) {
    (addr.segment_ord(), addr.doc())
}

/// Sanity check on `DocAddress` accessors used throughout this file.
#[test]
fn doc_address_accessors_round_trip() {
    let (index, schema) = three_doc_corpus();
    let content = schema.get_field("content").unwrap();
    let reader = index.reader().unwrap();
    let searcher = reader.searcher();
    let query = TermQuery::new(Term::from_field_text(content, "echo"));
    let hits = searcher.search(&query, &TopDocs::with_limit(10)).unwrap();
    assert_eq!(hits.len(), 1);
    let (_, addr) = hits[0];
    let (segment_ord, doc) = doc_address(addr);
    assert_eq!(segment_ord, 0);
    assert_eq!(doc, 2);
}
