use crate::core::SegmentReader;
use crate::query::exclude::Exclude;
use crate::query::intersection::Intersection;
use crate::query::require::AndMaybe;
use crate::query::union::Union;
use crate::query::{DocSet, EmptyScorer, Occur, Query, Scorer, Weight};
use crate::schema::Schema;
use crate::Result;

/// A tree of sub-queries combined by `Occur` (§4.3 "Intersection /
/// Union / AndNot" and §6 "Query tree": `Bool{must, should, must_not}`).
/// Every other combinator in this module is assembled from this one at
/// the `Weight`/`Scorer` level.
#[derive(Debug)]
pub struct BooleanQuery {
    clauses: Vec<(Occur, Box<dyn Query>)>,
}

impl BooleanQuery {
    pub fn new(clauses: Vec<(Occur, Box<dyn Query>)>) -> BooleanQuery {
        BooleanQuery { clauses }
    }

    pub fn clauses(&self) -> &[(Occur, Box<dyn Query>)] {
        &self.clauses
    }
}

impl Query for BooleanQuery {
    fn weight(&self, schema: &Schema) -> Result<Box<dyn Weight>> {
        let mut clause_weights = Vec::with_capacity(self.clauses.len());
        for (occur, query) in &self.clauses {
            clause_weights.push((*occur, query.weight(schema)?));
        }
        Ok(Box::new(BooleanWeight { clause_weights }))
    }
}

struct BooleanWeight {
    clause_weights: Vec<(Occur, Box<dyn Weight>)>,
}

impl BooleanWeight {
    fn scorers(&self, reader: &SegmentReader) -> Result<(Vec<Box<dyn Scorer>>, Vec<Box<dyn Scorer>>, Vec<Box<dyn Scorer>>)> {
        let mut musts = Vec::new();
        let mut shoulds = Vec::new();
        let mut must_nots = Vec::new();
        for (occur, weight) in &self.clause_weights {
            let scorer = weight.scorer(reader)?;
            match occur {
                Occur::Must => musts.push(scorer),
                Occur::Should => shoulds.push(scorer),
                Occur::MustNot => must_nots.push(scorer),
            }
        }
        Ok((musts, shoulds, must_nots))
    }
}

fn combine_and(mut scorers: Vec<Box<dyn Scorer>>) -> Box<dyn Scorer> {
    if scorers.len() == 1 {
        scorers.pop().unwrap()
    } else {
        Box::new(Intersection::build(scorers))
    }
}

fn combine_or(mut scorers: Vec<Box<dyn Scorer>>) -> Box<dyn Scorer> {
    if scorers.len() == 1 {
        scorers.pop().unwrap()
    } else {
        Box::new(Union::build(scorers))
    }
}

impl Weight for BooleanWeight {
    fn scorer(&self, reader: &SegmentReader) -> Result<Box<dyn Scorer>> {
        let (musts, shoulds, must_nots) = self.scorers(reader)?;

        let positive: Box<dyn Scorer> = match (musts.is_empty(), shoulds.is_empty()) {
            (true, true) => Box::new(EmptyScorer),
            (false, true) => combine_and(musts),
            (true, false) => combine_or(shoulds),
            (false, false) => Box::new(AndMaybe::build(combine_and(musts), combine_or(shoulds))),
        };

        if must_nots.is_empty() {
            Ok(positive)
        } else {
            Ok(Box::new(Exclude::build(positive, combine_or(must_nots))))
        }
    }

    fn count(&self, reader: &SegmentReader) -> Result<u32> {
        let mut scorer = self.scorer(reader)?;
        let mut count = 0u32;
        while scorer.advance() {
            if !reader.is_deleted(scorer.doc()) {
                count += 1;
            }
        }
        Ok(count)
    }
}
