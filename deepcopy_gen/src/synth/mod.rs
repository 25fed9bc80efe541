//! Lowers copy plans into fix-up statements for the method body.
//!
//! Generated bodies start from `let mut cp = self.clone();`, so only fields
//! whose plan subtree is non-trivial need statements. Nested non-pointer
//! structs extend the assignment path (`cp.a.b = …`); crossing a pointer or
//! container boundary switches to a rebuilt expression over a borrowed
//! source. Every synthesized node charges a shared per-run budget as a
//! safety net against runaway output.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::deps::DependencyTracker;
use crate::error::Error;
use crate::plan::{ContainerKind, CopyPlanNode};
use crate::request::{GenerationOptions, ReceiverKind};
use crate::shape::PointerKind;


/// Upper bound on synthesized nodes per run; exceeding it aborts generation.
pub(crate) const MAX_SYNTHESIZED_STATEMENTS: usize = 4096;

/// Statement synthesizer for one generation run.
pub(crate) struct Synthesizer<'a> {
    options: &'a GenerationOptions,
    deps: &'a mut DependencyTracker,
    budget: &'a mut usize,
}

impl<'a> Synthesizer<'a> {
    pub(crate) fn new(
        options: &'a GenerationOptions,
        deps: &'a mut DependencyTracker,
        budget: &'a mut usize,
    ) -> Self {
        Self {
            options,
            deps,
            budget,
        }
    }

    /// Fix-up statements for a requested type's fieldwise plan.
    pub(crate) fn fixups(&mut self, plan: &CopyPlanNode) -> Result<Vec<TokenStream>, Error> {
        let CopyPlanNode::Fieldwise { children } = plan else {
            return Err(Error::Internal(
                "copy plan for a requested type must be fieldwise".to_owned(),
            ));
        };
        let mut statements = Vec::new();
        self.field_fixups(children, &quote!(cp), &quote!(self), &mut statements)?;
        Ok(statements)
    }

    fn field_fixups(
        &mut self,
        children: &[(crate::shape::FieldKey, CopyPlanNode)],
        target: &TokenStream,
        source: &TokenStream,
        out: &mut Vec<TokenStream>,
    ) -> Result<(), Error> {
        for (key, child) in children {
            if child.is_trivial() {
                continue;
            }
            let member = key.to_member();
            let t = quote!(#target.#member);
            let s = quote!(#source.#member);
            if let CopyPlanNode::Fieldwise { children } = child {
                self.field_fixups(children, &t, &s, out)?;
            } else {
                let expr = self.copy_expr(child, &quote!((&#s)))?;
                self.charge()?;
                out.push(quote!(#t = #expr;));
            }
        }
        Ok(())
    }

    /// An expression producing a copy of `src`, which must evaluate to a
    /// borrow of the source value and be atomic or parenthesized.
    fn copy_expr(&mut self, plan: &CopyPlanNode, src: &TokenStream) -> Result<TokenStream, Error> {
        self.charge()?;
        let tokens = match plan {
            CopyPlanNode::DirectAssign | CopyPlanNode::DynamicDispatch => quote!(#src.clone()),
            CopyPlanNode::AllocateAndRecurse {
                kind: PointerKind::Plain,
                inner,
                ..
            } => {
                let inner = self.copy_expr(inner, &quote!(v))?;
                quote!(#src.as_ref().map(|v| #inner))
            }
            CopyPlanNode::AllocateAndRecurse {
                kind,
                nullable,
                inner,
            } => {
                let ctor = self.pointer_ctor(*kind);
                if *nullable {
                    let inner = self.copy_expr(inner, &quote!((&**v)))?;
                    quote!(#src.as_ref().map(|v| #ctor::new(#inner)))
                } else {
                    let inner = self.copy_expr(inner, &quote!((&**#src)))?;
                    quote!(#ctor::new(#inner))
                }
            }
            CopyPlanNode::Elementwise { container, inner } => {
                let inner = self.copy_expr(inner, &quote!(v))?;
                match container {
                    ContainerKind::Seq => quote!(#src.iter().map(|v| #inner).collect()),
                    ContainerKind::Map => {
                        quote!(#src.iter().map(|(k, v)| (k.clone(), #inner)).collect())
                    }
                    ContainerKind::Array => quote!(#src.each_ref().map(|v| #inner)),
                }
            }
            CopyPlanNode::Fieldwise { children } => {
                let mut statements = Vec::new();
                self.field_fixups(children, &quote!(cp), src, &mut statements)?;
                quote!({
                    let mut cp = #src.clone();
                    #(#statements)*
                    cp
                })
            }
            CopyPlanNode::CycleGuard { kind, nullable, .. } => {
                if *nullable {
                    let call = self.cycle_call(*kind, &quote!((&**v)))?;
                    quote!(#src.as_ref().map(|v| #call))
                } else {
                    let call = self.cycle_call(*kind, &quote!((&**#src)))?;
                    call
                }
            }
            CopyPlanNode::ValueCycle { .. } => self.value_cycle_call(src),
        };
        Ok(tokens)
    }

    /// Recursion through the generated method on the cycle target, shaped to
    /// match the configured receiver form.
    fn cycle_call(&mut self, kind: PointerKind, deref: &TokenStream) -> Result<TokenStream, Error> {
        let method = format_ident!("{}", self.options.method);
        if self.options.copy_into {
            let ctor = self.pointer_ctor(kind);
            return Ok(quote!({
                let mut fresh = #deref.clone();
                #deref.#method(&mut fresh);
                #ctor::new(fresh)
            }));
        }
        let tokens = match self.options.receiver {
            ReceiverKind::Value => {
                let ctor = self.pointer_ctor(kind);
                quote!(#ctor::new(#deref.#method()))
            }
            ReceiverKind::Pointer => match kind {
                PointerKind::Rc | PointerKind::Arc => {
                    let ctor = self.pointer_ctor(kind);
                    quote!(#ctor::from(#deref.#method()))
                }
                PointerKind::Boxed | PointerKind::Plain => quote!(#deref.#method()),
            },
        };
        Ok(tokens)
    }

    /// Recursion through the generated method on a struct reached by value;
    /// the result is the bare struct, unwrapped from the receiver form.
    fn value_cycle_call(&mut self, deref: &TokenStream) -> TokenStream {
        let method = format_ident!("{}", self.options.method);
        if self.options.copy_into {
            return quote!({
                let mut fresh = #deref.clone();
                #deref.#method(&mut fresh);
                fresh
            });
        }
        match self.options.receiver {
            ReceiverKind::Value => quote!(#deref.#method()),
            ReceiverKind::Pointer => quote!(*#deref.#method()),
        }
    }

    fn pointer_ctor(&mut self, kind: PointerKind) -> TokenStream {
        match kind {
            PointerKind::Rc => {
                let alias = self.deps.record("std::rc::Rc");
                quote!(#alias)
            }
            PointerKind::Arc => {
                let alias = self.deps.record("std::sync::Arc");
                quote!(#alias)
            }
            PointerKind::Boxed | PointerKind::Plain => quote!(Box),
        }
    }

    fn charge(&mut self) -> Result<(), Error> {
        *self.budget += 1;
        if *self.budget > MAX_SYNTHESIZED_STATEMENTS {
            return Err(Error::Internal(
                "synthesized statement budget exceeded; refusing to truncate output".to_owned(),
            ));
        }
        Ok(())
    }
}
