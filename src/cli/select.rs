//! Interactive chain selection

use dialoguer::Select;
use pr_chain::error::{Error, Result};
use pr_chain::graph::find_chain_by_leaf;
use pr_chain::types::PrChain;

/// Pick the chain to operate on.
///
/// `leaf` selects by leaf head branch; otherwise a single chain is taken as
/// is and several are offered in a menu. `None` means there is nothing to do.
pub fn select_chain<'a>(chains: &'a [PrChain], leaf: Option<&str>) -> Result<Option<&'a PrChain>> {
    if let Some(leaf) = leaf {
        return find_chain_by_leaf(chains, leaf)
            .map(Some)
            .ok_or_else(|| Error::Precondition(format!("no chain ends at branch '{leaf}'")));
    }

    match chains {
        [] => Ok(None),
        [only] => Ok(Some(only)),
        _ => {
            let items: Vec<String> = chains.iter().map(describe_chain).collect();
            let picked = Select::new()
                .with_prompt("Select a PR chain")
                .items(&items)
                .default(0)
                .interact_opt()
                .map_err(|e| Error::Internal(format!("Failed to read selection: {e}")))?;
            Ok(picked.map(|i| &chains[i]))
        }
    }
}

/// One-line menu entry: `<base> <- <#n,#m,...> <- <head>` followed by the titles
fn describe_chain(chain: &PrChain) -> String {
    let titles: Vec<&str> = chain.iter().map(|pr| pr.title.as_str()).collect();
    format!("{chain}  ({})", titles.join(" / "))
}
