use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::{parse_quote, Ident, ImplItemFn};

/// This macro is added before a method of `Simulator` struct in the impl block.
/// Use this macro to first check if current game phase is exactly the phase in
/// the attribute.
///
/// For example, `#[allowed_phase(PlaceBets)]` will make a method first check
/// if current game phase is `PlaceBets`. If not, the method returns
/// `Error::WrongPhase`. The method must return the crate's `Result`.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    match expand_allowed_phase(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_allowed_phase(attr: TokenStream2, item: TokenStream2) -> syn::Result<TokenStream2> {
    let phase: Ident = syn::parse2(attr)?;
    let mut ast: ImplItemFn = syn::parse2(item)?;
    let function_name = ast.sig.ident.to_string();
    let early_return: syn::Stmt = parse_quote! {
        if self.current_game_phase != GamePhase::#phase {
            return Err(crate::Error::WrongPhase {
                operation: #function_name,
                expected: GamePhase::#phase,
                actual: self.current_game_phase,
            });
        }
    };
    ast.block.stmts.insert(0, early_return);
    Ok(ast.into_token_stream())
}
