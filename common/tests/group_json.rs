//! Decoding groups from their JSON form.

use bondswap_common::{
    Address, ApplicationArg, ApplicationId, AssetId, BondSwapError, TransactionGroup, TxnKind,
    MAX_GROUP_SIZE,
};

#[test]
fn exchange_group_decodes_with_defaults() {
    let group: TransactionGroup = serde_json::from_str(
        r#"[
            {"kind":"axfer","asset_id":1001,"asset_amount":100},
            {"kind":"axfer","asset_id":1002,"asset_amount":100},
            {"kind":"pay","amount":1250},
            {"kind":"appl","application_id":77,"application_args":["redeem_coupon","0x00ff"]}
        ]"#,
    )
    .unwrap();

    assert_eq!(group.len(), 4);
    assert_eq!(group[0].kind, TxnKind::AssetTransfer);
    assert_eq!(group[1].asset_id, AssetId(1002));
    assert!(group[2].rekey_to.is_zero());
    assert!(group[2].sender.is_zero());
    assert_eq!(group[3].application_id, ApplicationId(77));
    assert_eq!(group[3].first_arg(), Some(&ApplicationArg::from("redeem_coupon")));
    assert_eq!(group[3].application_args[1].as_bytes(), &[0x00u8, 0xff][..]);
}

#[test]
fn addresses_decode_from_hex() {
    let manager = Address::new([0x4d; 32]);
    let json = format!(r#"[{{"kind":"pay","sender":"0x{}"}}]"#, "4d".repeat(32));

    let group: TransactionGroup = serde_json::from_str(&json).unwrap();
    assert_eq!(group[0].sender, manager);

    let short = r#"[{"kind":"pay","sender":"4d4d"}]"#;
    assert!(serde_json::from_str::<TransactionGroup>(short).is_err());
}

#[test]
fn any_length_up_to_the_cap_decodes() {
    for len in [0, 1, 3, MAX_GROUP_SIZE] {
        let json = format!("[{}]", vec![r#"{"kind":"pay"}"#; len].join(","));
        let group: TransactionGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(group.len(), len);
    }

    let json = format!("[{}]", vec![r#"{"kind":"pay"}"#; MAX_GROUP_SIZE + 1].join(","));
    let err = serde_json::from_str::<TransactionGroup>(&json).unwrap_err();
    let expected = BondSwapError::GroupTooLarge { size: 17, max: 16 }.to_string();
    assert!(err.to_string().contains(&expected));
}

#[test]
fn unknown_fields_are_refused() {
    let json = r#"[{"kind":"pay","fee":1000}]"#;
    assert!(serde_json::from_str::<TransactionGroup>(json).is_err());
}
