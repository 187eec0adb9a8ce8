use super::Context;
use crate::mapping::Mapping;
use crate::reconcile::{Containment, check_order};
use crate::report;

/// The result of a containment assertion whose contents matched.
///
/// The content check has already run and reported; dropping this value is
/// fine. Call [`in_order`](Self::in_order) to additionally require that the
/// entries appear in the expected order.
pub struct Ordered<'a> {
    pending: Option<PendingOrder<'a>>,
}

struct PendingOrder<'a> {
    ctx: Context<'a>,
    expected: Mapping,
    mode: Containment,
    relation: String,
}

impl<'a> Ordered<'a> {
    /// Nothing left to check: the content check failed, or there is no
    /// order to get wrong.
    pub(crate) fn done() -> Self {
        Self { pending: None }
    }

    pub(crate) fn pending(
        ctx: Context<'a>,
        expected: Mapping,
        mode: Containment,
        relation: String,
    ) -> Self {
        Self {
            pending: Some(PendingOrder {
                ctx,
                expected,
                mode,
                relation,
            }),
        }
    }

    /// Require the expected entries to appear in the same relative order in
    /// the actual map. Does not repeat the content comparison, and does
    /// nothing if that comparison already failed.
    pub fn in_order(self) {
        let Some(p) = self.pending else {
            return;
        };
        if !check_order(p.ctx.actual(), &p.expected, p.mode) {
            p.ctx
                .fail(report::order_failure(&p.ctx.label(), &p.relation, &p.expected));
        }
    }
}
