// Transfert inconscient 1 parmi 2 construit sur ElGamal exponentiel et une
// clé privée partagée 2 parmi 2
pub mod channel;
pub mod message;
pub mod transfer;

pub use channel::{Channel, Transport};
pub use message::OtMessage;
pub use transfer::{
    check_indices, check_ot_params, receiver_finish, receiver_selection_bit, sender_respond,
    ObliviousTransfer, OtConfig, TransferState,
};
