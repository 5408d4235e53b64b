// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! ABI surface the bot touches. Kept deliberately small: the router's buy and
//! sell entry points, the ERC20 approve/Transfer pair, and the jager.meme
//! airdrop claim. Nothing else is decoded.

use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    contract TokenManager {
        /// Buy "as much as possible" for `funds` of native value.
        function buyTokenAMAP(address token, uint256 funds, uint256 minAmount) external payable;
        function sellToken(address token, uint256 amount, uint256 minFunds) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    contract IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        event Transfer(address indexed from, address indexed to, uint256 value);
    }

    #[derive(Debug, PartialEq, Eq)]
    contract AirdropClaim {
        function claim(
            address account,
            uint256 amount,
            uint256 deadline,
            bytes calldata sign,
            bool instant,
            address invitor
        ) external;
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::constants::TRANSFER_EVENT_TOPIC;
    use alloy::sol_types::SolEvent;

    #[test]
    fn transfer_topic_constant_matches_event_signature() {
        assert_eq!(super::IERC20::Transfer::SIGNATURE_HASH, TRANSFER_EVENT_TOPIC);
    }
}
